use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use storefront_cart::{Cart, CartSnapshot};
use storefront_catalog::Product;
use storefront_core::{Money, ProductId};

fn product(id: u64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("product {id}"),
        price: Money::from_cents(100 + id),
        description: String::new(),
        category: "bench".to_string(),
        image: String::new(),
        rating: None,
    }
}

fn filled_cart(lines: u64) -> Cart {
    let mut cart = Cart::new();
    for id in 0..lines {
        cart.add_item(&product(id), 1).expect("positive quantity");
    }
    cart
}

fn bench_add_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_add_item");
    for lines in [10u64, 100, 1_000] {
        let products: Vec<Product> = (0..lines).map(product).collect();
        group.bench_with_input(BenchmarkId::from_parameter(lines), &products, |b, products| {
            b.iter(|| {
                let mut cart = Cart::new();
                for p in products {
                    cart.add_item(black_box(p), 2).expect("positive quantity");
                }
                cart
            });
        });
    }
    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_summary");
    for lines in [10u64, 100, 1_000] {
        let cart = filled_cart(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &cart, |b, cart| {
            b.iter(|| black_box(cart).summary());
        });
    }
    group.finish();
}

fn bench_snapshot_restore(c: &mut Criterion) {
    let json = filled_cart(100)
        .snapshot()
        .to_json()
        .expect("snapshot serializes");
    c.bench_function("cart_restore_100_lines", |b| {
        b.iter(|| {
            let snapshot = CartSnapshot::from_json(black_box(&json)).expect("valid snapshot");
            Cart::restore(snapshot).expect("valid cart")
        });
    });
}

criterion_group!(benches, bench_add_item, bench_summary, bench_snapshot_restore);
criterion_main!(benches);
