use selective_catch as sc;
use sc::{CatchCondition, Class, Outcome, Thrown};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_returned_value_is_success() {
    init_logging();
    let out = sc::execute(|| Ok(1), &[]).unwrap();
    assert_eq!(out.value(), Some(&1));
    assert_eq!(out.into_pair(), (None, Some(1)));
}

#[test]
fn test_plain_error_without_conditions() {
    init_logging();
    let out = sc::execute(|| Err::<(), _>(Thrown::error("Message")), &[]).unwrap();
    assert_eq!(out, Outcome::Failure(Thrown::error("Message")));
    assert_eq!(out.error().map(ToString::to_string), Some("Error: Message".to_string()));
}

#[test]
fn test_subclass_error_with_matching_factory_condition() {
    init_logging();
    let custom = Class::error().extend("CustomError");
    let raised = Thrown::instance(&custom, "custom");
    let out = sc::execute(
        || Err::<(), _>(raised.clone()),
        &[sc::make_instance_of_condition(&custom)],
    )
    .unwrap();
    assert!(out.error().unwrap().is_same(&raised));
}

#[test]
fn test_subclass_error_escapes_exact_error_condition() {
    init_logging();
    let custom = Class::error().extend("CustomError");
    let raised = Thrown::instance(&custom, "custom");
    let escaped = sc::execute(
        || Err::<(), _>(raised.clone()),
        &[CatchCondition::from_fn(sc::is_error_thrown)],
    )
    .unwrap_err();
    assert!(escaped.is_same(&raised));
}

#[test]
fn test_null_caught_without_conditions() {
    init_logging();
    let out = sc::execute(|| Err::<(), _>(Thrown::Null), &[]).unwrap();
    assert_eq!(out.into_pair(), (Some(Thrown::Null), None));
}

#[test]
fn test_null_propagates_past_string_condition() {
    init_logging();
    let escaped = sc::execute(
        || Err::<(), _>(Thrown::Null),
        &[CatchCondition::from_fn(sc::is_string_thrown)],
    )
    .unwrap_err();
    assert_eq!(escaped, Thrown::Null);
}

#[test]
fn test_any_matching_condition_catches() {
    init_logging();
    let conditions = [
        CatchCondition::from_fn(sc::is_number_thrown),
        CatchCondition::from_fn(sc::is_array_thrown),
    ];
    let raised = Thrown::array([Thrown::from(1)]);
    let out = sc::execute(|| Err::<(), _>(raised.clone()), &conditions).unwrap();
    assert!(out.error().unwrap().is_same(&raised));
}

#[test]
fn test_propagated_value_keeps_identity() {
    init_logging();
    let raised = Thrown::object([("code", Thrown::from(500))]);
    let escaped = sc::execute(
        || Err::<(), _>(raised.clone()),
        &[CatchCondition::from_fn(sc::is_array_thrown)],
    )
    .unwrap_err();
    assert!(escaped.is_same(&raised));
}

#[test]
fn test_dispatcher_reuses_conditions() {
    init_logging();
    let dispatcher = sc::Dispatcher::new()
        .catching(CatchCondition::from_fn(sc::is_string_thrown))
        .catching(sc::make_instance_of_condition(Class::type_error()));

    let caught = dispatcher
        .execute(|| Err::<u8, _>(Thrown::instance(Class::type_error(), "bad type")))
        .unwrap();
    assert!(caught.is_failure());

    let escaped = dispatcher.execute(|| Err::<u8, _>(Thrown::error("plain"))).unwrap_err();
    assert_eq!(escaped, Thrown::error("plain"));

    assert_eq!(dispatcher.execute(|| Ok(7u8)).unwrap(), Outcome::Success(7));
}

#[test]
fn test_rust_errors_via_from_error() {
    init_logging();
    let out = sc::execute(
        || {
            let n = "seven".parse::<i32>().map_err(|e| Thrown::from_error(&e))?;
            Ok(n)
        },
        &[CatchCondition::from_fn(sc::is_error_thrown)],
    )
    .unwrap();
    assert_eq!(out.error().unwrap().to_string(), "Error: invalid digit found in string");
}

#[test]
fn test_propagated_value_works_with_question_mark() {
    fn run() -> Result<Outcome<()>, Box<dyn std::error::Error>> {
        let out = sc::execute(
            || Err(Thrown::from("unexpected")),
            &[CatchCondition::from_fn(sc::is_null_thrown)],
        )?;
        Ok(out)
    }
    let err = run().unwrap_err();
    assert_eq!(err.to_string(), "unexpected");
}

#[test]
fn test_caught_function_can_be_invoked() {
    init_logging();
    let retry = Thrown::function("retry", |args| match args.first() {
        Some(Thrown::Number(attempt)) => Thrown::Number(attempt + 1.0),
        _ => Thrown::Number(1.0),
    });
    let out = sc::execute(
        || Err::<(), _>(retry.clone()),
        &[CatchCondition::from_fn(sc::is_function_thrown)],
    )
    .unwrap();
    let Some(Thrown::Function(handler)) = out.error() else {
        panic!("expected a caught function, got {out:?}");
    };
    assert_eq!(handler.name(), "retry");
    assert_eq!(handler.call(&[Thrown::from(2)]), Thrown::from(3));
}
