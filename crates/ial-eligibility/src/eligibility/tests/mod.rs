mod aggregate;
mod allocation;
mod common;
