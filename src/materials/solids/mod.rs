pub mod tissue;
