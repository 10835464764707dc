//! The application: a container plus the service-provider lifecycle.

use crate::binder::HookBinder;
use crate::class::{ClassBuilder, Classes};
use crate::config::{AppConfig, DuplicatePolicy, LoadStrategy};
use crate::error::{Error, Result};
use crate::provider::{Phase, ServiceProvider};
use hookwire_hooks::{action, EventHost};
use hookwire_ioc::{Container, Parameters, Resolver};
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
  Pending,
  Loading,
  Loaded,
}

/// Owns the service container and runs the two-phase provider lifecycle.
///
/// The process entry point creates one application and shares it by cloning
/// the returned `Arc`. Everyday binding and resolution go through the
/// forwarding methods (`singleton`, `bind`, `make`, ...), which return exactly
/// what the container returns.
pub struct Application {
  me: Weak<Application>,
  container: Container,
  classes: Classes,
  host: Arc<dyn EventHost>,
  config: AppConfig,
  providers: Mutex<Vec<String>>,
  state: Mutex<LoadState>,
  booted: AtomicBool,
}

impl Application {
  pub fn new(host: Arc<dyn EventHost>, config: AppConfig) -> Arc<Self> {
    Arc::new_cyclic(|me| Application {
      me: me.clone(),
      container: Container::new(),
      classes: Classes::default(),
      host,
      config,
      providers: Mutex::new(Vec::new()),
      state: Mutex::new(LoadState::Pending),
      booted: AtomicBool::new(false),
    })
  }

  /// Creates the application and boots it.
  pub fn bootstrap(host: Arc<dyn EventHost>, config: AppConfig) -> Result<Arc<Self>> {
    let app = Self::new(host, config);
    app.boot()?;
    Ok(app)
  }

  pub(crate) fn weak(&self) -> Weak<Application> {
    self.me.clone()
  }

  /// Another strong handle to this application, if it is still alive.
  pub fn handle(&self) -> Option<Arc<Application>> {
    self.me.upgrade()
  }

  pub fn config(&self) -> &AppConfig {
    &self.config
  }

  pub fn host(&self) -> &Arc<dyn EventHost> {
    &self.host
  }

  pub fn container(&self) -> &Container {
    &self.container
  }

  pub fn classes(&self) -> &Classes {
    &self.classes
  }

  /// Binds class-method pairs to host hooks.
  pub fn hooks(&self) -> HookBinder<'_> {
    HookBinder::new(self)
  }

  // --- Classes ---

  /// Starts declaring a hook-callable class built with `T::default()`.
  pub fn class<T: Any + Send + Sync + Default>(&self, class_id: &str) -> ClassBuilder<'_, T> {
    ClassBuilder::new(
      self,
      class_id,
      Box::new(|_: &Resolver<'_>| -> hookwire_ioc::Result<T> { Ok(T::default()) }),
    )
  }

  /// Starts declaring a hook-callable class built by `factory`.
  pub fn class_with<T, F>(&self, class_id: &str, factory: F) -> ClassBuilder<'_, T>
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> hookwire_ioc::Result<T> + Send + Sync + 'static,
  {
    ClassBuilder::new(self, class_id, Box::new(factory))
  }

  /// Declares `P` as a service-provider class under `class_id`. The same
  /// identifier may also be declared with [`Application::class`] to expose
  /// hook methods.
  pub fn provider_class<P: ServiceProvider + Default + 'static>(&self, class_id: &str) {
    self.classes.insert_provider::<P>(class_id);
  }

  // --- Service Providers ---

  /// Adds a provider by class identifier. The identifier must name a class
  /// declared with [`Application::provider_class`].
  pub fn add_service_provider(&self, class_id: &str) -> Result<()> {
    self.validate_service_provider(class_id)?;

    // The state lock is held until the push, so a load that starts meanwhile
    // either sees this provider or makes the add fail.
    let state = self.state.lock();
    if *state != LoadState::Pending {
      tracing::warn!(class_id, "service provider added after loading started");
      return Err(Error::ProvidersAlreadyLoaded {
        class_id: class_id.to_owned(),
      });
    }

    let mut providers = self.providers.lock();
    if self.config.duplicates == DuplicatePolicy::Reject && providers.iter().any(|p| p == class_id) {
      return Err(Error::DuplicateServiceProvider {
        class_id: class_id.to_owned(),
      });
    }
    providers.push(class_id.to_owned());
    tracing::debug!(class_id, position = providers.len(), "service provider added");
    Ok(())
  }

  /// Adds several providers in order, stopping at the first invalid one.
  pub fn add_service_providers<I, S>(&self, class_ids: I) -> Result<()>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for class_id in class_ids {
      self.add_service_provider(class_id.as_ref())?;
    }
    Ok(())
  }

  /// Declares `P` under its type name and adds it.
  pub fn add_provider<P: ServiceProvider + Default + 'static>(&self) -> Result<()> {
    let class_id = type_name::<P>();
    self.provider_class::<P>(class_id);
    self.add_service_provider(class_id)
  }

  /// Registered provider identifiers, in registration order.
  pub fn providers(&self) -> Vec<String> {
    self.providers.lock().clone()
  }

  pub fn providers_loaded(&self) -> bool {
    *self.state.lock() == LoadState::Loaded
  }

  fn validate_service_provider(&self, class_id: &str) -> Result<fn() -> Box<dyn ServiceProvider>> {
    self
      .classes
      .provider_constructor(class_id)
      .ok_or_else(|| Error::InvalidServiceProvider {
        class_id: class_id.to_owned(),
      })
  }

  /// Arranges for the providers to load: on the configured host hook, or
  /// right away. Only the first call has an effect.
  pub fn boot(&self) -> Result<()> {
    if self.booted.swap(true, Ordering::SeqCst) {
      return Ok(());
    }

    match &self.config.load {
      LoadStrategy::Immediate => self.load_service_providers(),
      LoadStrategy::OnHook { tag, priority } => {
        let me = self.weak();
        self.host.add_action(
          tag,
          action(move |_| match me.upgrade() {
            Some(app) => app.load_service_providers().map_err(Into::into),
            None => {
              tracing::warn!("load hook fired after the application was dropped");
              Ok(())
            }
          }),
          *priority,
          0,
        );
        tracing::debug!(tag = %tag, priority, "provider load deferred to host hook");
        Ok(())
      }
    }
  }

  /// Instantiates every provider and runs `register` on all of them, then
  /// `boot` on all of them, both in registration order. Has an effect only
  /// until it first succeeds; calls made while it runs are no-ops.
  ///
  /// A failing provider aborts the pass and is reported as
  /// [`Error::Provider`]; the providers count as not loaded afterwards.
  pub fn load_service_providers(&self) -> Result<()> {
    let class_ids = {
      let mut state = self.state.lock();
      if *state != LoadState::Pending {
        return Ok(());
      }
      *state = LoadState::Loading;
      self.providers()
    };

    let outcome = self.run_provider_passes(&class_ids);
    *self.state.lock() = match &outcome {
      Ok(()) => LoadState::Loaded,
      Err(_) => LoadState::Pending,
    };
    outcome
  }

  fn run_provider_passes(&self, class_ids: &[String]) -> Result<()> {
    let mut loaded: Vec<(&str, Box<dyn ServiceProvider>)> = Vec::with_capacity(class_ids.len());

    for class_id in class_ids {
      let construct = self.validate_service_provider(class_id)?;
      let mut provider = construct();
      provider.register(self).map_err(|source| Error::Provider {
        provider: class_id.clone(),
        phase: Phase::Register,
        source,
      })?;
      tracing::trace!(class_id = %class_id, "service provider registered");
      loaded.push((class_id.as_str(), provider));
    }

    for (class_id, provider) in &mut loaded {
      provider.boot(self).map_err(|source| Error::Provider {
        provider: class_id.to_string(),
        phase: Phase::Boot,
        source,
      })?;
      tracing::trace!(class_id = %class_id, "service provider booted");
    }

    tracing::info!(providers = loaded.len(), "service providers loaded");
    Ok(())
  }

  // --- Container ---

  pub fn singleton<T, F>(&self, abstract_id: &str, factory: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> hookwire_ioc::Result<T> + Send + Sync + 'static,
  {
    self.container.singleton(abstract_id, factory)
  }

  pub fn bind<T, F>(&self, abstract_id: &str, factory: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> hookwire_ioc::Result<T> + Send + Sync + 'static,
  {
    self.container.bind(abstract_id, factory)
  }

  pub fn instance<T: Any + Send + Sync>(&self, abstract_id: &str, value: T) {
    self.container.instance(abstract_id, value)
  }

  pub fn singleton_trait<I, F>(&self, abstract_id: &str, factory: F)
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> hookwire_ioc::Result<Arc<I>> + Send + Sync + 'static,
  {
    self.container.singleton_trait(abstract_id, factory)
  }

  pub fn make<T: ?Sized + Any + Send + Sync>(&self, abstract_id: &str) -> hookwire_ioc::Result<Arc<T>> {
    self.container.make(abstract_id)
  }

  pub fn make_with<T: ?Sized + Any + Send + Sync>(
    &self,
    abstract_id: &str,
    parameters: &Parameters,
  ) -> hookwire_ioc::Result<Arc<T>> {
    self.container.make_with(abstract_id, parameters)
  }

  pub fn get<T: ?Sized + Any + Send + Sync>(&self, abstract_id: &str) -> hookwire_ioc::Result<Arc<T>> {
    self.container.get(abstract_id)
  }

  pub fn has(&self, abstract_id: &str) -> bool {
    self.container.has(abstract_id)
  }
}
