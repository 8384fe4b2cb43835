mod compare_scenarios;
mod utils;
