//! Contract tests for object_model
//!
//! These tests pin down the behaviour the interpreter layer relies on when it
//! drives objects through the realm and the internal methods.

mod arguments_contract_tests;
mod array_contract_tests;
mod builtins_contract_tests;
mod object_contract_tests;
mod value_contract_tests;
