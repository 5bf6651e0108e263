use std::{collections::HashSet, env};

fn extract_features() -> HashSet<String> {
    env::vars()
        .map(|(k, _)| k)
        .flat_map(|feat| feat.strip_prefix("CARGO_FEATURE_").map(str::to_lowercase))
        .collect()
}

/// Generates the SPL memory map for the selected board.
///
/// AM43xx boards only use the pad tables, and link with their loader's own script.
fn main() {
    let features = extract_features();
    for feature in features {
        match feature.as_str() {
            "am625_sk" => ti_spl::SplBuilder::new(ti_spl::Family::Am625)
                .stack_size(16 * 1024)
                .heap_size(32 * 1024)
                .stack_size_env_override("BOARD_STACK")
                .heap_size_env_override("BOARD_HEAP")
                .build()
                .unwrap(),
            _ => continue,
        }
        break;
    }
}
