pub mod snow;
