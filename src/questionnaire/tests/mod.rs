mod classification;
mod common;
