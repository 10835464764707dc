use hookwire_ioc::{Container, ContainerError};
use std::sync::Arc;

// --- Test Fixtures ---

// The trait must be Send + Sync for the container to accept it.
trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Basic Tests ---

#[test]
fn test_singleton_factory_is_shared() {
  // Arrange
  let container = Container::new();
  container.singleton("simple", |_| Ok(SimpleService { id: 101 }));

  // Act
  let r1 = container.make::<SimpleService>("simple").unwrap();
  let r2 = container.make::<SimpleService>("simple").unwrap();

  // Assert
  assert_eq!(r1.id, 101);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_instance_is_returned_as_is() {
  // Arrange
  let container = Container::new();
  container.instance("answer", 42_u32);

  // Act
  let r1 = container.get::<u32>("answer").unwrap();
  let r2 = container.get::<u32>("answer").unwrap();

  // Assert
  assert_eq!(*r1, 42);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_bind_builds_on_every_call() {
  // Arrange
  let container = Container::new();
  container.bind("transient", |_| Ok(SimpleService { id: 303 }));

  // Act
  let r1 = container.make::<SimpleService>("transient").unwrap();
  let r2 = container.make::<SimpleService>("transient").unwrap();

  // Assert
  assert_eq!(r1.id, 303);
  assert_eq!(r2.id, 303);
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_trait_resolution() {
  // Arrange
  let container = Container::new();
  container.singleton_trait::<dyn Greeter, _>("greeter", |_| Ok(Arc::new(EnglishGreeter) as Arc<dyn Greeter>));

  // Act
  let greeter = container.make::<dyn Greeter>("greeter").unwrap();

  // Assert
  assert_eq!(greeter.greet(), "Hello!");
}

#[test]
fn test_missing_abstract_is_not_bound() {
  let container = Container::new();

  let err = container.make::<SimpleService>("missing").unwrap_err();

  assert!(matches!(err, ContainerError::NotBound { ref abstract_id } if abstract_id == "missing"));
}

#[test]
fn test_wrong_type_is_a_mismatch() {
  // Arrange
  let container = Container::new();
  container.instance("number", 7_i64);

  // Act
  let err = container.make::<String>("number").unwrap_err();

  // Assert
  match err {
    ContainerError::TypeMismatch { abstract_id, expected } => {
      assert_eq!(abstract_id, "number");
      assert!(expected.contains("String"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_has_and_forget() {
  let container = Container::new();
  assert!(container.is_empty());

  container.instance("x", 1_u8);
  assert!(container.has("x"));
  assert_eq!(container.len(), 1);

  assert!(container.forget("x"));
  assert!(!container.has("x"));
  assert!(!container.forget("x"));
}
