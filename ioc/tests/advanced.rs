use hookwire_ioc::{Container, ContainerError, Parameters};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::thread;

// --- Test Fixtures ---

struct SiteOptions {
  home_url: String,
}

struct OptionStore {
  home_url: String,
}

struct Permalinks {
  options: Arc<OptionStore>,
}

impl Permalinks {
  fn link(&self, slug: &str) -> String {
    format!("{}/{}/", self.options.home_url, slug)
  }
}

// --- Resolution Graphs ---

#[test]
fn test_factories_resolve_their_dependencies() {
  // Arrange
  let container = Container::new();
  container.instance(
    "site_options",
    SiteOptions {
      home_url: "https://example.org".to_string(),
    },
  );
  container.singleton("option_store", |r| {
    let options = r.make::<SiteOptions>("site_options")?;
    Ok(OptionStore {
      home_url: options.home_url.clone(),
    })
  });
  container.singleton("permalinks", |r| {
    Ok(Permalinks {
      options: r.make::<OptionStore>("option_store")?,
    })
  });

  // Act
  let permalinks = container.make::<Permalinks>("permalinks").unwrap();

  // Assert
  assert_eq!(permalinks.link("hello-world"), "https://example.org/hello-world/");
}

#[test]
fn test_containers_are_isolated() {
  let first = Container::new();
  let second = Container::new();

  first.instance("greeting", String::from("I am first"));

  assert_eq!(*first.make::<String>("greeting").unwrap(), "I am first");
  assert!(second.make::<String>("greeting").is_err());
}

#[test]
fn test_singleton_factory_is_called_only_once_under_concurrency() {
  static BUILDS: AtomicUsize = AtomicUsize::new(0);
  struct SharedIndex;

  // Arrange
  let container = Container::new();
  container.singleton("index", |_| {
    BUILDS.fetch_add(1, Ordering::SeqCst);
    // Widen the window for a race if initialization were not synchronized.
    thread::sleep(std::time::Duration::from_millis(50));
    Ok(SharedIndex)
  });

  // Act
  thread::scope(|s| {
    for _ in 0..20 {
      s.spawn(|| {
        let _service = container.make::<SharedIndex>("index").unwrap();
      });
    }
  });

  // Assert
  assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_circular_dependency_is_an_error() {
  struct ServiceA {
    _b: Arc<ServiceB>,
  }
  struct ServiceB {
    _a: Arc<ServiceA>,
  }

  // Arrange: A -> B -> A
  let container = Container::new();
  container.singleton("circular_a", |r| Ok(ServiceA { _b: r.make("circular_b")? }));
  container.singleton("circular_b", |r| Ok(ServiceB { _a: r.make("circular_a")? }));

  // Act
  let err = container.make::<ServiceA>("circular_a").err().unwrap();

  // Assert
  assert!(matches!(
    err,
    ContainerError::CircularDependency { ref abstract_id } if abstract_id == "circular_a"
  ));
  // The guard is released, so the container is still usable.
  container.instance("after", 1_u8);
  assert_eq!(*container.make::<u8>("after").unwrap(), 1);
}

#[test]
fn test_rebinding_replaces_the_previous_value() {
  let container = Container::new();

  container.instance("tagline", "Just another site".to_string());
  assert_eq!(*container.make::<String>("tagline").unwrap(), "Just another site");

  container.instance("tagline", "A better tagline".to_string());
  assert_eq!(*container.make::<String>("tagline").unwrap(), "A better tagline");
}

#[test]
fn test_singleton_depending_on_transient() {
  struct TransientDependency {
    id: usize,
  }
  struct SingletonHolder {
    dependency: Arc<TransientDependency>,
  }

  // Arrange
  let counter = Arc::new(AtomicUsize::new(0));
  let container = Container::new();
  let factory_counter = Arc::clone(&counter);
  container.bind("transient", move |_| {
    Ok(TransientDependency {
      id: factory_counter.fetch_add(1, Ordering::SeqCst),
    })
  });
  container.singleton("holder", |r| {
    Ok(SingletonHolder {
      dependency: r.make("transient")?,
    })
  });

  // Act
  let holder1 = container.make::<SingletonHolder>("holder").unwrap();
  let holder2 = container.make::<SingletonHolder>("holder").unwrap();
  let standalone = container.make::<TransientDependency>("transient").unwrap();

  // Assert
  assert!(Arc::ptr_eq(&holder1, &holder2));
  assert!(Arc::ptr_eq(&holder1.dependency, &holder2.dependency));
  assert_eq!(holder1.dependency.id, 0);
  assert_eq!(standalone.id, 1);
}

#[test]
fn test_factory_may_register_while_resolving() {
  // No shard lock is held while a factory runs, so binding from inside one
  // must not deadlock.
  let container = Container::new();
  container.singleton("registrar", |r| {
    r.container().instance("registered_late", 99_u32);
    Ok(())
  });

  container.make::<()>("registrar").unwrap();

  assert_eq!(*container.make::<u32>("registered_late").unwrap(), 99);
}

#[test]
fn test_parameters_reach_the_factory() {
  struct Mailer {
    host: String,
    port: u16,
  }

  // Arrange
  let container = Container::new();
  container.bind("mailer", |r| {
    Ok(Mailer {
      host: r.require("host")?,
      port: r.parameter("port")?.unwrap_or(25),
    })
  });

  // Act
  let with_port = container
    .make_with::<Mailer>("mailer", &Parameters::new().with("host", "smtp.local").with("port", 2525))
    .unwrap();
  let default_port = container
    .make_with::<Mailer>("mailer", &[("host", "mx.local")].into_iter().collect())
    .unwrap();
  let missing = container.make::<Mailer>("mailer").err().unwrap();

  // Assert
  assert_eq!(with_port.host, "smtp.local");
  assert_eq!(with_port.port, 2525);
  assert_eq!(default_port.port, 25);
  assert!(matches!(missing, ContainerError::InvalidParameter { ref name, .. } if name == "host"));
}

#[test]
fn test_failed_singleton_factory_can_retry() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let container = Container::new();
  let factory_attempts = Arc::clone(&attempts);
  container.singleton("flaky", move |r| {
    if factory_attempts.fetch_add(1, Ordering::SeqCst) == 0 {
      return Err(hookwire_ioc::ContainerError::factory(r.abstract_id(), "not yet"));
    }
    Ok(5_u8)
  });

  assert!(matches!(
    container.make::<u8>("flaky"),
    Err(ContainerError::Factory { .. })
  ));
  assert_eq!(*container.make::<u8>("flaky").unwrap(), 5);
  assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_registration_and_resolution() {
  let container = Container::new();
  container.singleton("common_service", |_| Ok(42_i32));

  thread::scope(|s| {
    for i in 0..10_usize {
      let container = &container;
      s.spawn(move || {
        container.instance(&format!("thread_service_{}", i), i);
        for _ in 0..100 {
          assert_eq!(*container.make::<i32>("common_service").unwrap(), 42);
        }
        assert_eq!(*container.make::<usize>(&format!("thread_service_{}", i)).unwrap(), i);
      });
    }
  });

  assert_eq!(*container.make::<usize>("thread_service_5").unwrap(), 5);
}

#[test]
fn test_drop_behavior_of_singletons() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  struct ObjectCache;
  impl Drop for ObjectCache {
    fn drop(&mut self) {
      DROPS.fetch_add(1, Ordering::SeqCst);
    }
  }

  let container = Container::new();
  container.singleton("object_cache", |_| Ok(ObjectCache));

  let cache = container.make::<ObjectCache>("object_cache").unwrap();
  drop(cache);
  // The container still holds the singleton.
  assert_eq!(DROPS.load(Ordering::SeqCst), 0);

  drop(container);
  assert_eq!(DROPS.load(Ordering::SeqCst), 1);
}
