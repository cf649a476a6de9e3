mod mocks;

mod issuer_tests;
mod sweeper_tests;
