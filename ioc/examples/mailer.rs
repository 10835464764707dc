// examples/mailer.rs

use hookwire_ioc::{Container, ContainerError, Parameters};
use std::sync::Arc;

trait Transport: Send + Sync {
  fn deliver(&self, to: &str, body: &str);
}

struct StdoutTransport;

impl Transport for StdoutTransport {
  fn deliver(&self, to: &str, body: &str) {
    println!("[to {}] {}", to, body);
  }
}

/// Built per call; the sender address is a `make_with` parameter.
struct Mailer {
  from: String,
  transport: Arc<dyn Transport>,
}

impl Mailer {
  fn send(&self, to: &str, subject: &str) {
    self.transport.deliver(to, &format!("From: {} | Subject: {}", self.from, subject));
  }
}

fn main() -> Result<(), ContainerError> {
  let container = Container::new();

  container.singleton_trait::<dyn Transport, _>("transport", |_| Ok(Arc::new(StdoutTransport) as Arc<dyn Transport>));

  container.bind("mailer", |r| {
    Ok(Mailer {
      from: r.parameter("from")?.unwrap_or_else(|| "noreply@example.com".to_string()),
      transport: r.make::<dyn Transport>("transport")?,
    })
  });

  let default_mailer = container.make::<Mailer>("mailer")?;
  default_mailer.send("ada@example.com", "Welcome");

  let support = container.make_with::<Mailer>("mailer", &Parameters::new().with("from", "support@example.com"))?;
  support.send("ada@example.com", "Your ticket");

  // Asking for the wrong type is an error, not a panic.
  if let Err(e) = container.make::<String>("transport") {
    println!("Expected failure: {}", e);
  }

  Ok(())
}
