// Property-based tests for nsflat.
//
// Run all property tests:
//   cargo test --test property_tests
//
// Run with more cases (default is 256):
//   PROPTEST_CASES=1000 cargo test --test property_tests

mod flatten_properties;
mod lexer_properties;
