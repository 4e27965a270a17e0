pub mod interference;
