mod cli;
mod session;
