//! 测试与演示数据生成

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;

use super::model::NewProduct;

const WORDS: &[&str] = &[
    "amber", "anchor", "arrow", "aspen", "atlas", "basil", "beacon", "birch", "blossom",
    "breeze", "brook", "canyon", "cedar", "cinder", "clover", "comet", "coral", "cotton",
    "crystal", "dawn", "delta", "dune", "echo", "ember", "fable", "falcon", "fern", "flint",
    "forge", "frost", "garnet", "glacier", "granite", "harbor", "hazel", "horizon", "indigo",
    "iris", "ivory", "jasper", "juniper", "kestrel", "lagoon", "lantern", "lark", "linen",
    "lotus", "maple", "marble", "meadow", "mesa", "mint", "nectar", "nimbus", "oak", "onyx",
    "orchid", "pebble", "pepper", "pine", "prairie", "quartz", "quill", "raven", "reed",
    "ridge", "river", "saffron", "sage", "slate", "sparrow", "spruce", "summit", "thistle",
    "thunder", "timber", "topaz", "tulip", "umber", "valley", "velvet", "willow", "winter",
    "zephyr",
];

/// 随机生成合法的产品数据
///
/// 同一工厂内名称唯一，词表用尽后追加序号（`"oak-2"`）。
pub struct ProductFactory<R: Rng> {
    rng: R,
    used: HashSet<String>,
}

impl ProductFactory<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for ProductFactory<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ProductFactory<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            used: HashSet::new(),
        }
    }

    pub fn make(&mut self) -> NewProduct {
        let name = self.unique_word();
        let description = Some(self.sentence());
        // [1.00, 1000.00]，两位小数
        let price = Decimal::new(self.rng.gen_range(100..=100_000), 2);
        let stock = self.rng.gen_range(0..=100);

        NewProduct {
            name,
            description,
            price,
            stock,
        }
    }

    pub fn make_many(&mut self, count: usize) -> Vec<NewProduct> {
        (0..count).map(|_| self.make()).collect()
    }

    fn unique_word(&mut self) -> String {
        let free: Vec<&str> = WORDS
            .iter()
            .copied()
            .filter(|w| !self.used.contains(*w))
            .collect();

        let name = match free.choose(&mut self.rng) {
            Some(word) => word.to_string(),
            None => {
                let base = WORDS[self.rng.gen_range(0..WORDS.len())];
                (2..)
                    .map(|n| format!("{}-{}", base, n))
                    .find(|candidate| !self.used.contains(candidate))
                    .unwrap_or_else(|| base.to_string())
            }
        };
        self.used.insert(name.clone());
        name
    }

    fn sentence(&mut self) -> String {
        let len = self.rng.gen_range(4..=9);
        let words: Vec<&str> = (0..len)
            .filter_map(|_| WORDS.choose(&mut self.rng).copied())
            .collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::CreateProductRequest;
    use rand::{rngs::StdRng, SeedableRng};
    use rust_decimal::prelude::ToPrimitive;

    #[test]
    fn products_stay_within_bounds() {
        let mut factory = ProductFactory::with_rng(StdRng::seed_from_u64(7));
        for product in factory.make_many(200) {
            assert!(product.price >= Decimal::ONE);
            assert!(product.price <= Decimal::new(1000, 0));
            assert!(product.price.scale() <= 2);
            assert!((0..=100).contains(&product.stock));
            let description = product.description.unwrap();
            assert!(description.ends_with('.'));
            assert!(description.starts_with(|c: char| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn names_are_unique_even_past_the_word_list() {
        let mut factory = ProductFactory::with_rng(StdRng::seed_from_u64(11));
        let names: Vec<String> = factory
            .make_many(WORDS.len() * 3)
            .into_iter()
            .map(|p| p.name)
            .collect();
        let distinct: HashSet<&String> = names.iter().collect();
        assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn generated_products_pass_request_validation() {
        let mut factory = ProductFactory::new();
        for product in factory.make_many(20) {
            let request = CreateProductRequest {
                name: Some(product.name.clone()),
                description: product.description.clone(),
                price: product.price.to_f64(),
                stock: Some(product.stock),
                ..Default::default()
            };
            let validated = request.into_new_product().unwrap();
            assert_eq!(validated.name, product.name);
            assert_eq!(validated.price, product.price);
        }
    }
}
