// Chart rendering (bitmap output)
pub mod chart;
