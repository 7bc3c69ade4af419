mod client;

pub use client::VsphereClient;
