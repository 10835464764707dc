// examples/plugin.rs

use hookwire::{AppConfig, Application, ProviderError, ServiceProvider};
use hookwire_hooks::Hooks;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

// --- Services ---

struct Settings {
  site_name: String,
}

struct TitleFormatter {
  settings: Arc<Settings>,
}

impl TitleFormatter {
  fn format(&self, title: &str) -> String {
    format!("{} | {}", title, self.settings.site_name)
  }
}

// --- Providers ---

#[derive(Default)]
struct SettingsProvider;

impl ServiceProvider for SettingsProvider {
  fn register(&mut self, app: &Application) -> Result<(), ProviderError> {
    app.instance(
      "settings",
      Settings {
        site_name: "Hookwire Demo".to_string(),
      },
    );
    Ok(())
  }

  fn boot(&mut self, _app: &Application) -> Result<(), ProviderError> {
    Ok(())
  }
}

#[derive(Default)]
struct TitleProvider;

impl ServiceProvider for TitleProvider {
  fn register(&mut self, app: &Application) -> Result<(), ProviderError> {
    // `settings` comes from another provider, so it is only resolved when the
    // formatter is built.
    app
      .class_with("title_formatter", |r| {
        Ok(TitleFormatter {
          settings: r.make::<Settings>("settings")?,
        })
      })
      .method("invoke", |formatter: &TitleFormatter, args| {
        let title = args.first().and_then(Value::as_str).unwrap_or_default();
        Ok(json!(formatter.format(title)))
      })
      .declare();
    Ok(())
  }

  fn boot(&mut self, app: &Application) -> Result<(), ProviderError> {
    app.hooks().filter("the_title", "title_formatter")?;
    Ok(())
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config_path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/examples/hookwire_logging.yaml"));
  hookwire_logging::init_from_file(config_path)?;

  // The host owns the hooks; the application only registers callbacks on it.
  let hooks = Hooks::shared();
  let app = Application::bootstrap(hooks.clone(), AppConfig::default())?;

  app.provider_class::<SettingsProvider>("settings_provider");
  app.provider_class::<TitleProvider>("title_provider");
  app.add_service_providers(["title_provider", "settings_provider"])?;

  println!("Providers loaded before host start: {}", app.providers_loaded());
  hooks.do_action("plugins_loaded", &[])?;
  println!("Providers loaded after host start: {}", app.providers_loaded());

  let title = hooks.apply_filters("the_title", json!("Hello, world"), &[])?;
  println!("Filtered title: {}", title);

  Ok(())
}
