use std::fs;
use minecraft_schematic_bridge::{
    format_schematic, parse_block_id, Block, BlockEntity, BlockIdParseError, Error, JsonLoadOption,
    JsonSaveOption, Metadata, NbtKind, NbtTag, PendingTick, PendingTickInfo, Region, Schematic,
};

fn build_gate_schematic() -> Schematic {
    let mut schematic = Schematic::named("Redstone Gate");
    schematic.metadata = Metadata {
        name: "Redstone Gate".to_string(),
        author: "integration tests".to_string(),
        mc_version: 3700,
        ..Metadata::default()
    };

    let mut region = Region::new("Main", [4, 2, 4]);
    let wire = parse_block_id("minecraft:redstone_wire[north=side,south=none]").unwrap();
    let torch = parse_block_id("redstone_torch[lit=true]").unwrap();
    let stone = parse_block_id("stone").unwrap();

    for x in 0..4 {
        for z in 0..4 {
            region.set_block([x, 0, z], &stone).unwrap();
        }
    }
    region.set_block([1, 1, 1], &wire).unwrap();
    region.set_block([2, 1, 2], &torch).unwrap();

    region.set_block_entity_at(
        [2, 1, 2],
        BlockEntity::new().with_tag("id", NbtTag::from("minecraft:redstone_torch")),
    );
    region.set_pending_ticks_at(
        [1, 1, 1],
        vec![PendingTick {
            priority: 0,
            sub_tick: 0,
            time: 2,
            info: PendingTickInfo::Block {
                id: "minecraft:redstone_wire".to_string(),
            },
        }],
    );

    schematic.regions.push(region);
    schematic
}

#[test]
fn test_block_id_round_trip() {
    let source = "minecraft:redstone_wire[north=side,south=none]";
    let block = parse_block_id(source).unwrap();
    assert_eq!(block.namespace, "minecraft");
    assert_eq!(block.id, "redstone_wire");
    assert_eq!(block.attributes.len(), 2);
    assert_eq!(block.attributes["north"], "side");
    assert_eq!(block.attributes["south"], "none");
    assert_eq!(block.full_id(), source);
}

#[test]
fn test_parse_errors_match_scan_order() {
    assert_eq!(
        parse_block_id("stone[").unwrap_err(),
        BlockIdParseError::BracketsNotInPairs
    );
    assert_eq!(
        parse_block_id("a:b:c").unwrap_err(),
        BlockIdParseError::TooManyColons
    );
}

#[test]
fn test_attribute_map_insert_remove() {
    let mut block = parse_block_id(
        "piston_head[down=false,east=true,north=true,south=true,up=false,west=true]",
    )
    .unwrap();
    assert_eq!(block.attributes.len(), 6);

    assert!(block.attributes.remove("down").is_some());
    assert_eq!(block.attributes.len(), 5);
    assert!(block.attributes.remove("down").is_none());

    block.set_attribute("down", "true");
    assert_eq!(block.attributes.len(), 6);
    assert!(block.attributes.contains_key("down"));
}

#[test]
fn test_nbt_kind_mismatch_is_typed() {
    let tag = NbtTag::from("a string tag");
    match tag.as_byte() {
        Err(Error::TagTypeMismatch { expected, found }) => {
            assert_eq!(expected, NbtKind::Byte);
            assert_eq!(found, NbtKind::String);
        }
        other => panic!("expected a kind mismatch, got {:?}", other),
    }
}

#[test]
fn test_schematic_json_file_round_trip() {
    let schematic = build_gate_schematic();

    let mut path = std::env::temp_dir();
    path.push("mc_bridge_integration_gate.json");
    schematic
        .save_json_file(&path, &JsonSaveOption { pretty: true })
        .unwrap();

    let restored = Schematic::load_json_file(&path, &JsonLoadOption {}).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(restored.metadata, schematic.metadata);
    assert_eq!(restored.regions.len(), 1);
    let region = &restored.regions[0];
    assert_eq!(region.shape(), [4, 2, 4]);
    assert_eq!(
        region.block_at([1, 1, 1]),
        schematic.regions[0].block_at([1, 1, 1])
    );
    assert_eq!(region.block_entity_at([2, 1, 2]).unwrap().tags["id"]
        .as_str()
        .unwrap(), "minecraft:redstone_torch");
    assert_eq!(region.pending_ticks_at([1, 1, 1]).len(), 1);
    assert_eq!(restored.total_blocks(false), schematic.total_blocks(false));
}

#[test]
fn test_format_schematic_summary() {
    let schematic = build_gate_schematic();
    let text = format_schematic(&schematic);
    assert!(text.contains("Schematic: Redstone Gate"));
    assert!(text.contains("Region: Main"));
    assert!(text.contains("minecraft:redstone_torch[lit=true]"));
}

#[test]
fn test_region_counts() {
    let schematic = build_gate_schematic();
    let region = &schematic.regions[0];
    assert_eq!(region.volume(), 32);
    // 16 stone + wire + torch
    assert_eq!(region.total_blocks(false), 18);
    assert_eq!(region.total_blocks(true), 32);

    let air = Block::air();
    assert_eq!(region.block_at([0, 1, 0]), Some(&air));
}
