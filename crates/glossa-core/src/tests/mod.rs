mod fakes;
mod senses_tests;
