mod config;
mod interview;
mod persistence;
mod progression;
