//! Test doubles for the external providers.

mod mock_conversion_provider;
mod mock_gas_provider;

#[allow(unused_imports)]
pub use mock_conversion_provider::MockConversionProvider;
#[allow(unused_imports)]
pub use mock_gas_provider::MockGasProvider;
