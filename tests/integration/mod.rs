mod common;
mod foreach_tests;
mod round_trip_tests;
mod translation_tests;
