pub mod candle;
pub mod instrument;
pub mod tick;
