pub mod phototime_core;
