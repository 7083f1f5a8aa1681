pub mod esewa;
