use common::Context;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AddCategoryToProduct, AdjustStock, CategoryId, CreateProduct, InMemoryProductRepository,
    ProductService,
};

fn widget(id: &str) -> CreateProduct {
    CreateProduct::parse(id, "Benchmark Widget", "", 1000, "usd", 100).unwrap()
}

fn bench_create_product(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_product", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = ProductService::new(InMemoryProductRepository::new());
                service
                    .create_product(&Context::new(), widget("prod-bench"))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_stock_round_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = ProductService::new(InMemoryProductRepository::new());
    let ctx = Context::new();
    rt.block_on(async {
        service
            .create_product(&ctx, widget("prod-bench"))
            .await
            .unwrap()
    });

    c.bench_function("domain/increase_decrease_stock", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cmd = AdjustStock::parse("prod-bench", 1).unwrap();
                service.increase_stock(&ctx, cmd.clone()).await.unwrap();
                service.decrease_stock(&ctx, cmd).await.unwrap();
            });
        });
    });
}

fn bench_products_by_category(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = ProductService::new(InMemoryProductRepository::new());
    let ctx = Context::new();

    rt.block_on(async {
        for i in 0..500 {
            let id = format!("prod-{i:04}");
            service.create_product(&ctx, widget(&id)).await.unwrap();
            if i % 5 == 0 {
                let cmd = AddCategoryToProduct::parse(&id, "cat-bench", "Bench").unwrap();
                service.add_category_to_product(&ctx, cmd).await.unwrap();
            }
        }
    });

    let category_id = CategoryId::new("cat-bench").unwrap();
    c.bench_function("domain/products_by_category_500", |b| {
        b.iter(|| {
            rt.block_on(async {
                let products = service
                    .get_products_by_category(&ctx, &category_id)
                    .await
                    .unwrap();
                assert_eq!(products.len(), 100);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_product,
    bench_stock_round_trip,
    bench_products_by_category
);
criterion_main!(benches);
