//! Integration tests for the product catalog.
//!
//! These tests drive ProductService against the in-memory repository and
//! check what ends up stored, including concurrent writers and cancellation.

use std::sync::Arc;

use common::{Context, ContextError};
use domain::{
    AddCategoryToProduct, AdjustStock, CategoryId, CreateProduct, DomainError,
    InMemoryProductRepository, Product, ProductId, ProductRepository, ProductService,
    RemoveCategoryFromProduct, SaveOptions, UpdateProduct, Version,
};

/// Helper to create a test product service
fn create_service() -> ProductService<InMemoryProductRepository> {
    ProductService::new(InMemoryProductRepository::new())
}

fn widget(id: &str) -> CreateProduct {
    CreateProduct::parse(id, "Widget", "", 500, "usd", 10).unwrap()
}

fn pid(id: &str) -> ProductId {
    ProductId::new(id).unwrap()
}

mod product_lifecycle {
    use super::*;

    #[tokio::test]
    async fn create_normalizes_and_echoes_fields() {
        let service = create_service();
        let ctx = Context::new();

        let product = service.create_product(&ctx, widget("prod-1")).await.unwrap();

        assert_eq!(product.id().as_str(), "prod-1");
        assert_eq!(product.name().as_str(), "Widget");
        assert!(product.description().is_empty());
        assert_eq!(product.price().amount(), 500);
        assert_eq!(product.price().currency(), "USD");
        assert_eq!(product.stock().quantity(), 10);
        assert!(product.categories().is_empty());
        assert_eq!(product.created_at(), product.updated_at());
    }

    #[tokio::test]
    async fn duplicate_create_keeps_one_record() {
        let service = create_service();
        let ctx = Context::new();

        service.create_product(&ctx, widget("prod-1")).await.unwrap();
        let result = service.create_product(&ctx, widget("prod-1")).await;

        assert!(matches!(result, Err(DomainError::ProductExists(_))));
        assert_eq!(service.get_all_products(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_unknown_product_is_not_found() {
        let service = create_service();
        let result = service.get_product_by_id(&Context::new(), &pid("nope")).await;
        assert!(matches!(result, Err(DomainError::ProductNotFound(id)) if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let service = create_service();
        let ctx = Context::new();

        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        let updated = service
            .update_product(
                &ctx,
                UpdateProduct::parse("prod-1", "Widget Pro", "Now with more", 750, "usd", 3)
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(updated.name().as_str(), "Widget Pro");
        assert_eq!(updated.version(), Version::new(2));

        let updated = service
            .decrease_stock(&ctx, AdjustStock::parse("prod-1", 3).unwrap())
            .await
            .unwrap();
        assert!(!updated.stock().is_available());

        service.delete_product(&ctx, &pid("prod-1")).await.unwrap();
        assert!(service.get_all_products(&ctx).await.unwrap().is_empty());
    }
}

mod categories {
    use super::*;

    #[tokio::test]
    async fn add_then_remove_category() {
        let service = create_service();
        let ctx = Context::new();
        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        service
            .add_category_to_product(
                &ctx,
                AddCategoryToProduct::parse("prod-1", "cat-1", "Electronics").unwrap(),
            )
            .await
            .unwrap();
        let product = service
            .remove_category_from_product(
                &ctx,
                RemoveCategoryFromProduct::parse("prod-1", "cat-1").unwrap(),
            )
            .await
            .unwrap();

        assert!(product.categories().is_empty());
        assert!(!product.has_category(&CategoryId::new("cat-1").unwrap()));

        let stored = service.get_product_by_id(&ctx, &pid("prod-1")).await.unwrap();
        assert!(stored.categories().is_empty());
    }

    #[tokio::test]
    async fn adding_a_category_twice_keeps_one_entry() {
        let service = create_service();
        let ctx = Context::new();
        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        let cmd = AddCategoryToProduct::parse("prod-1", "cat-1", "Electronics").unwrap();
        let first = service
            .add_category_to_product(&ctx, cmd.clone())
            .await
            .unwrap();
        let second = service.add_category_to_product(&ctx, cmd).await.unwrap();

        assert_eq!(second.categories().len(), 1);
        assert_eq!(second.updated_at(), first.updated_at());
    }

    #[tokio::test]
    async fn products_by_category_are_filtered_and_ordered() {
        let service = create_service();
        let ctx = Context::new();

        for id in ["prod-c", "prod-a", "prod-b"] {
            service.create_product(&ctx, widget(id)).await.unwrap();
        }
        for id in ["prod-c", "prod-a"] {
            service
                .add_category_to_product(
                    &ctx,
                    AddCategoryToProduct::parse(id, "cat-1", "Electronics").unwrap(),
                )
                .await
                .unwrap();
        }

        let tagged = service
            .get_products_by_category(&ctx, &CategoryId::new("cat-1").unwrap())
            .await
            .unwrap();
        let ids: Vec<_> = tagged.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["prod-a", "prod-c"]);

        let untagged = service
            .get_products_by_category(&ctx, &CategoryId::new("cat-2").unwrap())
            .await
            .unwrap();
        assert!(untagged.is_empty());
    }
}

mod repository {
    use super::*;

    #[tokio::test]
    async fn save_then_find_returns_equal_product() {
        let repository = InMemoryProductRepository::new();
        let ctx = Context::new();

        let cmd = widget("prod-1");
        let mut product = Product::new(cmd.id, cmd.name, cmd.description, cmd.price, cmd.stock);
        product.add_category(domain::Category::parse("cat-1", "Electronics").unwrap());

        let version = repository
            .save(&ctx, &product, SaveOptions::expect_new())
            .await
            .unwrap();
        product.set_version(version);

        let found = repository.find_by_id(&ctx, product.id()).await.unwrap();
        assert_eq!(found, product);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let repository = InMemoryProductRepository::new();
        let service = ProductService::new(repository.clone());
        let ctx = Context::new();
        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        // Two writers load the same version.
        let mut first = repository.find_by_id(&ctx, &pid("prod-1")).await.unwrap();
        let mut second = first.clone();

        first.increase_stock(1);
        repository
            .save(&ctx, &first, SaveOptions::expect_version(first.version()))
            .await
            .unwrap();

        second.increase_stock(2);
        let result = repository
            .save(&ctx, &second, SaveOptions::expect_version(second.version()))
            .await;
        assert!(result.is_err());

        let stored = repository.find_by_id(&ctx, &pid("prod-1")).await.unwrap();
        assert_eq!(stored.stock().quantity(), 11);
    }

    #[tokio::test]
    async fn concurrent_increases_never_lose_updates() {
        let service = Arc::new(create_service());
        let ctx = Context::new();
        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let ctx = Context::new();
                loop {
                    let cmd = AdjustStock::parse("prod-1", 1).unwrap();
                    match service.increase_stock(&ctx, cmd).await {
                        Ok(_) => break,
                        Err(DomainError::ConcurrencyConflict { .. }) => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = service.get_product_by_id(&ctx, &pid("prod-1")).await.unwrap();
        assert_eq!(stored.stock().quantity(), 20);
        assert_eq!(stored.version(), Version::new(11));
    }
}

mod cancellation {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn cancelled_update_leaves_store_untouched() {
        let service = create_service();
        let ctx = Context::new();
        let created = service.create_product(&ctx, widget("prod-1")).await.unwrap();

        let cancelled = ctx.child();
        cancelled.cancel();
        let result = service
            .update_product(
                &cancelled,
                UpdateProduct::parse("prod-1", "Gadget", "", 1, "EUR", 0).unwrap(),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Interrupted(ContextError::Cancelled))
        ));

        let stored = service.get_product_by_id(&ctx, &pid("prod-1")).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn expired_deadline_aborts_delete() {
        let service = create_service();
        let ctx = Context::new();
        service.create_product(&ctx, widget("prod-1")).await.unwrap();

        let expired = ctx.child().with_timeout(Duration::ZERO);
        let result = service.delete_product(&expired, &pid("prod-1")).await;
        assert!(matches!(
            result,
            Err(DomainError::Interrupted(ContextError::DeadlineExceeded))
        ));
        assert!(service.get_product_by_id(&ctx, &pid("prod-1")).await.is_ok());
    }
}
