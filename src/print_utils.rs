use crate::block::Block;
use crate::region::Region;
use crate::schematic::Schematic;

pub fn format_block(block: &Block) -> String {
    let mut out = format!("Block: {}:{}\n", block.namespace, block.id);
    if !block.attributes.is_empty() {
        out.push_str("Attributes:\n");
        for (key, value) in &block.attributes {
            out.push_str(&format!("  {}: {}\n", key, value));
        }
    }
    out
}

pub fn format_region(region: &Region) -> String {
    let mut out = format!("  Region: {}\n", region.name);
    out.push_str(&format!("    Offset: {:?}\n", region.offset));
    out.push_str(&format!("    Shape: {:?}\n", region.shape()));
    out.push_str("    Palette:\n");
    for (idx, block) in region.palette.iter().enumerate() {
        out.push_str(&format!("      {}: {}\n", idx, block.full_id()));
    }
    out.push_str(&format!(
        "    Blocks: {} of {} voxels\n",
        region.total_blocks(false),
        region.volume()
    ));
    out.push_str(&format!(
        "    Entities: {}, block entities: {}, pending ticks: {}\n",
        region.entities.len(),
        region.block_entities.len(),
        region.pending_ticks.len()
    ));
    out
}

pub fn format_schematic(schematic: &Schematic) -> String {
    let mut out = format!("Schematic: {}\n", schematic.metadata.name);
    out.push_str("Regions:\n");
    for region in &schematic.regions {
        out.push_str(&format_region(region));
    }
    out
}
