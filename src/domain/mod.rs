// Domain layer: chain primitives and the fetcher port. No networking here.

pub mod model;
pub mod ports;
pub mod pubkey;
