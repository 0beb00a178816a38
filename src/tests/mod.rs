
mod discovery;
