mod mocks;
mod service_tests;
