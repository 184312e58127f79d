pub mod collector_stub;
