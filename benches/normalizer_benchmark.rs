//! Text normalizer and product card extraction benchmarks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use storefront_crawler::infrastructure::parsing::{ParseContext, TextNormalizer, extract_unit};
use storefront_crawler::infrastructure::ProductListParser;
use storefront_crawler::test_utils::listing_page;

const TITLES: &[&str] = &[
    "Susu UHT 250ML Coklat",
    "Shampoo Anti Dandruff (Pack of 3) 170ML",
    "Teh Celup 25 Sachet (Isi 2)",
    "Sabun Cuci Piring Jeruk Nipis",
    "Beras Premium 5KG Pulen",
];

fn bench_normalizer(c: &mut Criterion) {
    let normalizer = TextNormalizer::default();

    c.bench_function("extract_unit", |b| {
        b.iter(|| {
            for title in TITLES {
                black_box(extract_unit(black_box(title)));
            }
        });
    });

    c.bench_function("clean_sales_number", |b| {
        b.iter(|| normalizer.clean_sales_number(black_box("1.250+ terjual")));
    });

    c.bench_function("parse_price", |b| {
        b.iter(|| normalizer.parse_price(black_box("Rp1.250.000")));
    });
}

fn bench_page_extraction(c: &mut Criterion) {
    let parser = ProductListParser::new().expect("default selectors compile");
    let cards: Vec<(String, String, String)> = (0..80)
        .map(|i| {
            (
                format!("{} #{i}", TITLES[i % TITLES.len()]),
                format!("Rp{}.500", 10 + i),
                format!("{}+ terjual", i * 3),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str, &str)> = cards
        .iter()
        .map(|(n, p, s)| (n.as_str(), p.as_str(), s.as_str()))
        .collect();
    let html = listing_page(&borrowed);
    let context = ParseContext::new(1, "https://www.tokopedia.com/shop/product");

    c.bench_function("parse_page_80_cards", |b| {
        b.iter(|| parser.parse_page(black_box(html.as_str()), &context));
    });
}

criterion_group!(benches, bench_normalizer, bench_page_extraction);
criterion_main!(benches);
