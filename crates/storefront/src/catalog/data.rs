//! Fixed catalog contents.

use std::sync::LazyLock;

use eliteshop_core::{Category, CategoryId, Price, Product, ProductId};

pub(super) static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(products);

pub(super) static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(categories);

struct Seed {
    id: &'static str,
    name: &'static str,
    price: i64,
    original_price: Option<i64>,
    description: &'static str,
    category: &'static str,
    images: [&'static str; 2],
    rating: f64,
    reviews: u32,
    stock_count: u32,
    features: [&'static str; 4],
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: "1",
        name: "Premium Wireless Headphones",
        price: 29_999,
        original_price: Some(39_999),
        description: "Experience crystal-clear audio with our premium wireless headphones featuring active noise cancellation and 30-hour battery life.",
        category: "electronics",
        images: [
            "https://images.pexels.com/photos/3394650/pexels-photo-3394650.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/1649771/pexels-photo-1649771.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.8,
        reviews: 1247,
        stock_count: 15,
        features: [
            "Active Noise Cancellation",
            "30h Battery Life",
            "Quick Charge",
            "Premium Materials",
        ],
    },
    Seed {
        id: "2",
        name: "Smart Fitness Watch",
        price: 24_999,
        original_price: None,
        description: "Track your fitness goals with this advanced smartwatch featuring heart rate monitoring, GPS, and 7-day battery life.",
        category: "electronics",
        images: [
            "https://images.pexels.com/photos/393047/pexels-photo-393047.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/267394/pexels-photo-267394.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.6,
        reviews: 892,
        stock_count: 23,
        features: [
            "Heart Rate Monitor",
            "GPS Tracking",
            "7-day Battery",
            "Water Resistant",
        ],
    },
    Seed {
        id: "3",
        name: "Minimalist Backpack",
        price: 8_999,
        original_price: Some(11_999),
        description: "A sleek, minimalist backpack perfect for daily commuting with laptop compartment and water-resistant material.",
        category: "fashion",
        images: [
            "https://images.pexels.com/photos/2905238/pexels-photo-2905238.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/2422278/pexels-photo-2422278.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.7,
        reviews: 456,
        stock_count: 8,
        features: [
            "Laptop Compartment",
            "Water Resistant",
            "Ergonomic Design",
            "Multiple Pockets",
        ],
    },
    Seed {
        id: "4",
        name: "Organic Green Tea Set",
        price: 3_499,
        original_price: None,
        description: "Premium organic green tea collection featuring 6 unique blends sourced from sustainable farms.",
        category: "food",
        images: [
            "https://images.pexels.com/photos/1638280/pexels-photo-1638280.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/1793035/pexels-photo-1793035.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.9,
        reviews: 234,
        stock_count: 42,
        features: [
            "Organic Certified",
            "6 Unique Blends",
            "Sustainable Sourcing",
            "Premium Quality",
        ],
    },
    Seed {
        id: "5",
        name: "Professional Camera Lens",
        price: 59_999,
        original_price: None,
        description: "High-quality professional camera lens with superior optics for stunning photography.",
        category: "electronics",
        images: [
            "https://images.pexels.com/photos/90946/pexels-photo-90946.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/51383/photo-camera-subject-photographer-51383.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.8,
        reviews: 167,
        stock_count: 5,
        features: [
            "Professional Grade",
            "Superior Optics",
            "Weather Sealed",
            "Fast Autofocus",
        ],
    },
    Seed {
        id: "6",
        name: "Luxury Skincare Set",
        price: 14_999,
        original_price: Some(19_999),
        description: "Complete luxury skincare routine with natural ingredients for radiant, healthy skin.",
        category: "beauty",
        images: [
            "https://images.pexels.com/photos/3762879/pexels-photo-3762879.jpeg?auto=compress&cs=tinysrgb&w=800",
            "https://images.pexels.com/photos/3785147/pexels-photo-3785147.jpeg?auto=compress&cs=tinysrgb&w=800",
        ],
        rating: 4.7,
        reviews: 689,
        stock_count: 12,
        features: [
            "Natural Ingredients",
            "Dermatologist Tested",
            "Anti-Aging Formula",
            "Paraben Free",
        ],
    },
];

/// Category id, name, slug, icon.
const CATEGORY_ROWS: [(&str, &str, &str, &str); 6] = [
    ("1", "Electronics", "electronics", "Smartphone"),
    ("2", "Fashion", "fashion", "Shirt"),
    ("3", "Beauty", "beauty", "Sparkles"),
    ("4", "Food & Beverage", "food", "Coffee"),
    ("5", "Home & Garden", "home", "Home"),
    ("6", "Sports", "sports", "Dumbbell"),
];

fn products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            price: Price::from_cents(seed.price),
            original_price: seed.original_price.map(Price::from_cents),
            description: seed.description.to_owned(),
            category: seed.category.to_owned(),
            images: seed.images.iter().map(|&s| s.to_owned()).collect(),
            rating: seed.rating,
            reviews: seed.reviews,
            in_stock: seed.stock_count > 0,
            stock_count: seed.stock_count,
            features: seed.features.iter().map(|&s| s.to_owned()).collect(),
        })
        .collect()
}

fn categories() -> Vec<Category> {
    CATEGORY_ROWS
        .iter()
        .map(|&(id, name, slug, icon)| Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: slug.to_owned(),
            icon: icon.to_owned(),
        })
        .collect()
}
