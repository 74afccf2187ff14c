pub mod ekantipur;
pub mod nagarik;
pub mod onlinekhabar;

pub use ekantipur::EkantipurAdapter;
pub use nagarik::NagarikAdapter;
pub use onlinekhabar::OnlinekhabarAdapter;

use super::Adapter;

/// Returns all available Nepali newspaper adapters
pub fn get_adapters() -> Vec<Adapter> {
    vec![
        Adapter::Ekantipur(EkantipurAdapter::new()),
        Adapter::Onlinekhabar(OnlinekhabarAdapter::new()),
        Adapter::Nagarik(NagarikAdapter::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::SourceAdapter;
    use nn_core::types::NEPAL;

    #[test]
    fn test_get_adapters() {
        let adapters = get_adapters();
        assert_eq!(adapters.len(), 3);
        assert!(adapters
            .iter()
            .all(|a| a.source_metadata().region == NEPAL));
    }
}
