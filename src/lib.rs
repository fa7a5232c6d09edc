pub mod errors;
pub mod class;
pub mod thrown;
pub mod outcome;
pub mod conditions;  // predicates, factories and the name registry
pub mod dispatcher;

pub use class::{Class, ClassId};
pub use conditions::builtins::{
    is_array_thrown, is_big_int_thrown, is_boolean_thrown, is_error_thrown, is_function_thrown,
    is_instance_of_error_thrown, is_null_thrown, is_number_thrown, is_object_thrown,
    is_string_thrown, is_symbol_thrown, is_type_of_object_thrown, is_undefined_thrown,
};
pub use conditions::{
    make_exact_type_condition, make_instance_of_condition, CatchCondition, ConditionRegistry,
};
pub use dispatcher::{execute, execute_async, is_caught, Dispatcher};
pub use errors::CatchError;
pub use outcome::Outcome;
pub use thrown::{Callable, Instance, Symbol, Thrown, ThrownKind};
