//! パフォーマンスベンチマーク
//!
//! 組み込みカテゴリ定義の解析、ツリー構築、スラッグ生成、商品入力の読み込みを測定します。

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::fmt::Write as _;

use catalogkit::catalog::{CategoryTree, DEFAULT_CATEGORIES_SQL};
use catalogkit::input::read_products_from;
use catalogkit::sql::parse_category_rows;
use catalogkit::{slugify, InputFormat, InputLimits};

/// 組み込みの`INSERT`文を行に分解する
fn benchmark_parse_categories(c: &mut Criterion) {
    let mut group = c.benchmark_group("categories");
    group.throughput(Throughput::Bytes(DEFAULT_CATEGORIES_SQL.len() as u64));

    group.bench_function("parse_rows", |b| {
        b.iter(|| parse_category_rows(black_box(DEFAULT_CATEGORIES_SQL)))
    });
    group.bench_function("build_tree_and_entries", |b| {
        b.iter(|| CategoryTree::from_sql(black_box(DEFAULT_CATEGORIES_SQL)).entries())
    });
    group.finish();
}

fn benchmark_slugify(c: &mut Criterion) {
    let names = [
        "Bujías y Encendido",
        "Aceites de Motor",
        "Instalación de Audio",
        "Sistemas de Iluminación LED & Xenón",
    ];
    c.bench_function("slugify", |b| {
        b.iter(|| {
            for name in &names {
                black_box(slugify(black_box(name)));
            }
        })
    });
}

/// 1万行のCSV入力
fn benchmark_read_csv(c: &mut Criterion) {
    let mut csv = String::from("Número de Parte,Producto,Existencia,Precio\n");
    for i in 0..10_000 {
        let _ = writeln!(csv, "FA-{i},Filtro de Aire {i},{},\"$1,{:03}.50\"", i % 7, i % 1000);
    }
    let limits = InputLimits::default();

    let mut group = c.benchmark_group("input");
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("read_csv_10k", |b| {
        b.iter(|| read_products_from(black_box(csv.as_bytes()), InputFormat::Csv, &limits))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_categories,
    benchmark_slugify,
    benchmark_read_csv
);
criterion_main!(benches);
