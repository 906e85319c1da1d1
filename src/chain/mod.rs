pub mod abi;
pub mod client;
pub mod contracts;

pub use abi::ContractAbiClient;
pub use client::{from_base_units, to_base_units, ChainClient, SignerClient};
pub use contracts::{Erc20, VvsRouter};
