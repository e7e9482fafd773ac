mod invalidation_tests;
mod scale_tests;
