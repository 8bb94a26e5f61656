use criterion::{criterion_group, criterion_main, Criterion};
use minecraft_schematic_bridge::{parse_block_id, Block, Region, Schematic};

fn benchmark_parse_block_id(c: &mut Criterion) {
    c.bench_function("parse plain id", |b| {
        b.iter(|| parse_block_id("minecraft:stone").unwrap())
    });

    c.bench_function("parse id with attributes", |b| {
        b.iter(|| {
            parse_block_id("minecraft:redstone_wire[east=none,north=side,power=11,south=none,west=up]")
                .unwrap()
        })
    });
}

fn benchmark_render_full_id(c: &mut Criterion) {
    let block =
        parse_block_id("minecraft:redstone_wire[east=none,north=side,power=11,south=none,west=up]")
            .unwrap();
    c.bench_function("render full id", |b| b.iter(|| block.full_id()));
}

fn benchmark_region_fill(c: &mut Criterion) {
    let stone = Block::from_id("minecraft:stone").unwrap();
    c.bench_function("fill 32x32x32 region", |b| {
        b.iter(|| {
            let mut region = Region::new("Main", [32, 32, 32]);
            for x in 0..32 {
                for y in 0..32 {
                    for z in 0..32 {
                        region.set_block([x, y, z], &stone).unwrap();
                    }
                }
            }
            region
        })
    });
}

fn benchmark_json_dump(c: &mut Criterion) {
    let mut schematic = Schematic::named("Bench");
    let mut region = Region::new("Main", [16, 16, 16]);
    let stone = Block::from_id("minecraft:stone").unwrap();
    for x in 0..16 {
        for z in 0..16 {
            region.set_block([x, 0, z], &stone).unwrap();
        }
    }
    schematic.regions.push(region);

    c.bench_function("json dump", |b| {
        b.iter(|| schematic.get_json_string().unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_parse_block_id,
    benchmark_render_full_id,
    benchmark_region_fill,
    benchmark_json_dump
);
criterion_main!(benches);
