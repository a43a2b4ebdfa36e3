//! Runtime hot path benchmarks
//!
//! Run with: `cargo bench --package tiger-rt`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tiger_rt::abi::{object_size, WORD_SIZE};
use tiger_rt::dispatch::lookup_unchecked;
use tiger_rt::{ClassDecl, HostHeap, LayoutTable, ObjectAllocator, Object};

fn bench_allocation(c: &mut Criterion) {
    let heap = HostHeap::new();
    let table = [0usize; 4];
    let mut group = c.benchmark_group("allocation");

    for fields in [0usize, 4, 32] {
        let size = object_size(fields);
        group.throughput(Throughput::Bytes(size as u64));

        for zeroed in [true, false] {
            let label = if zeroed { "zeroed" } else { "raw" };
            group.bench_with_input(BenchmarkId::new(label, fields), &size, |b, &size| {
                b.iter(|| {
                    let block = heap.allocate(size, zeroed).unwrap();
                    let object = unsafe { Object::init(block, table.as_ptr().cast()) };
                    black_box(object.addr());
                    unsafe { heap.release(block) };
                })
            });
        }
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let heap = HostHeap::new();
    let table = [0x10usize, 0x20, 0x30, 0x40];
    let block = heap.allocate(WORD_SIZE, true).unwrap();
    let object = unsafe { Object::init(block, table.as_ptr().cast()) };

    c.bench_function("dispatch_unchecked", |b| {
        b.iter(|| unsafe {
            black_box(lookup_unchecked(
                object.as_ptr(),
                black_box(0),
                black_box(3 * WORD_SIZE as i64),
            ))
        })
    });

    unsafe { heap.release(block) };
}

fn bench_layout(c: &mut Criterion) {
    let decls: Vec<ClassDecl> = (0..64)
        .map(|i| {
            let decl = ClassDecl::new(format!("C{}", i))
                .field(format!("f{}", i))
                .method("run")
                .method(format!("m{}", i));
            if i == 0 {
                decl
            } else {
                decl.extends(format!("C{}", i - 1))
            }
        })
        .collect();

    c.bench_function("layout_chain_64", |b| {
        b.iter(|| black_box(LayoutTable::build(black_box(&decls), None).unwrap()))
    });
}

criterion_group!(benches, bench_allocation, bench_dispatch, bench_layout);
criterion_main!(benches);
