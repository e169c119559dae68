//! # vigil-ref-users
//!
//! User-request reference domain for the VIGIL conditional validation engine.
//!
//! Demonstrates five scenarios over sample requests:
//!
//! 1. **Age limits**: a required `INT32` with a range, checked on untyped
//!    records and a typed profile alike.
//! 2. **Premium users**: fields required only for certain values of another
//!    field.
//! 3. **Payment group**: all-or-nothing fields, one violation per missing
//!    member.
//! 4. **US addresses**: condition expressions over nested address paths.
//! 5. **Partial updates**: transform, apply and re-validate only the touched
//!    fields, then refresh a schema in place.
//!
//! All data is fictional. Schemas are embedded in the crate.

pub mod mock_data;
pub mod model;
pub mod scenarios;
