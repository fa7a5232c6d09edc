use selective_catch as sc;
use num_bigint::BigInt;
use sc::{Class, Instance, Thrown, ThrownKind};

type Predicate = fn(&Thrown) -> bool;

fn samples() -> Vec<(&'static str, Thrown)> {
    vec![
        ("undefined", Thrown::Undefined),
        ("null", Thrown::Null),
        ("bool", Thrown::from(true)),
        ("number", Thrown::from(3.5)),
        ("nan", Thrown::Number(f64::NAN)),
        ("bigint", Thrown::BigInt(BigInt::from(10))),
        ("string", Thrown::from("oops")),
        ("symbol", Thrown::symbol("token")),
        ("array", Thrown::array([Thrown::from(1)])),
        ("object", Thrown::object([("a", Thrown::from(1))])),
        ("function", Thrown::function("handler", |_| Thrown::Undefined)),
        ("error", Thrown::error("plain")),
        ("type_error", Thrown::instance(Class::type_error(), "typed")),
        ("custom_error", Thrown::instance(&Class::error().extend("CustomError"), "custom")),
        ("instance", Thrown::from(Instance::new(&Class::new("Point")).with_field("x", 1))),
    ]
}

fn matching(predicate: Predicate) -> Vec<&'static str> {
    samples()
        .into_iter()
        .filter(|(_, value)| predicate(value))
        .map(|(name, _)| name)
        .collect()
}

#[test]
fn test_primitive_predicates() {
    assert_eq!(matching(sc::is_undefined_thrown), vec!["undefined"]);
    assert_eq!(matching(sc::is_null_thrown), vec!["null"]);
    assert_eq!(matching(sc::is_boolean_thrown), vec!["bool"]);
    assert_eq!(matching(sc::is_number_thrown), vec!["number", "nan"]);
    assert_eq!(matching(sc::is_big_int_thrown), vec!["bigint"]);
    assert_eq!(matching(sc::is_string_thrown), vec!["string"]);
    assert_eq!(matching(sc::is_symbol_thrown), vec!["symbol"]);
    assert_eq!(matching(sc::is_function_thrown), vec!["function"]);
    assert_eq!(matching(sc::is_array_thrown), vec!["array"]);
}

#[test]
fn test_error_predicates() {
    assert_eq!(matching(sc::is_error_thrown), vec!["error"]);
    assert_eq!(
        matching(sc::is_instance_of_error_thrown),
        vec!["error", "type_error", "custom_error"]
    );
}

#[test]
fn test_object_predicates() {
    assert_eq!(matching(sc::is_object_thrown), vec!["object"]);
    assert_eq!(
        matching(sc::is_type_of_object_thrown),
        vec!["array", "object", "error", "type_error", "custom_error", "instance"]
    );
}

#[test]
fn test_type_of_object_agrees_with_kind() {
    for (name, value) in samples() {
        assert_eq!(
            sc::is_type_of_object_thrown(&value),
            value.kind() == ThrownKind::Object,
            "{name}"
        );
    }
}

#[test]
fn test_factory_covers_subclasses_only() {
    let animal = Class::new("Animal");
    let dog = animal.extend("Dog");
    let rock = Class::new("Rock");
    let is_animal = sc::make_instance_of_condition(&animal);

    assert!(is_animal.matches(&Instance::new(&animal).into()));
    assert!(is_animal.matches(&Instance::new(&dog).into()));
    assert!(!is_animal.matches(&Instance::new(&rock).into()));
    assert!(!is_animal.matches(&Thrown::Null));
    assert!(!is_animal.matches(&Thrown::Undefined));
    for (name, value) in samples() {
        assert!(!is_animal.matches(&value), "{name}");
    }
}
