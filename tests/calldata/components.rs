//! Integration tests for component encodings

use worldsmith_calldata::{ToCalldata, encode, flatten};
use worldsmith_foundation::{EntityId, Felt};
use worldsmith_storage::{Container, DirectionType, Exit, Inspectable, Player};

fn wire(value: &impl ToCalldata) -> Vec<Felt> {
    flatten(&encode(&value.to_calldata()))
}

fn felts(values: &[u64]) -> Vec<Felt> {
    values.iter().map(|v| Felt::from(*v)).collect()
}

#[test]
fn exit_encodes_direction_index() {
    let exit = Exit {
        inst: EntityId::from(3u64),
        is_exit: true,
        is_enterable: false,
        leads_to: EntityId::from(4u64),
        direction_type: DirectionType::West,
    };
    assert_eq!(wire(&exit), felts(&[3, 1, 0, 4, 4]));
}

#[test]
fn container_prefixes_item_list() {
    let container = Container {
        inst: EntityId::from(1u64),
        is_container: true,
        num_spaces: 5,
        item_ids: vec![EntityId::from(8u64), EntityId::from(9u64)],
    };
    assert_eq!(wire(&container), felts(&[1, 1, 5, 2, 8, 9]));
}

#[test]
fn inspectable_text_list_is_chunked() {
    let inspectable = Inspectable {
        inst: EntityId::from(1u64),
        is_inspectable: true,
        is_visible: true,
        text_index: 0,
        text: vec!["hi".to_string()],
    };
    assert_eq!(
        wire(&inspectable),
        felts(&[1, 1, 1, 0, 1, 0, 0x6869, 2])
    );
}

#[test]
fn player_carries_address() {
    let player = Player {
        inst: EntityId::from(2u64),
        is_player: true,
        address: Felt::from(0xabcu64),
        room: EntityId::from(6u64),
    };
    assert_eq!(wire(&player), felts(&[2, 1, 0xabc, 6]));
}
