//! Component records.
//!
//! The component set is closed: every kind is a variant of [`ComponentKind`]
//! and [`Component`], and every dispatch over kinds is an exhaustive match.
//! Field declaration order is the calldata order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use worldsmith_calldata::{NestedValue, ToCalldata};
use worldsmith_foundation::{EntityId, Error, ErrorKind, Felt};

/// Kind of area an `Area` component describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaType {
    /// Unspecified.
    #[default]
    None,
    /// A room.
    Room,
    /// Indoors, not a room.
    Indoor,
    /// Outdoors.
    Outdoor,
    /// Below ground.
    Underground,
}

impl AreaType {
    /// Variant index used on the wire.
    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Direction an `Exit` leads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionType {
    /// Unspecified.
    #[default]
    None,
    /// North.
    North,
    /// East.
    East,
    /// South.
    South,
    /// West.
    West,
    /// Up.
    Up,
    /// Down.
    Down,
}

impl DirectionType {
    /// Variant index used on the wire.
    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Names an entity. Present on every "real" entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_entity: bool,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Alternative names the parser accepts.
    #[serde(default)]
    pub alt_names: Vec<String>,
}

/// Marks an entity as a place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_area: bool,
    /// What sort of place.
    #[serde(default)]
    pub area_type: AreaType,
}

/// A passage to another entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_exit: bool,
    /// Whether players can pass through.
    #[serde(default)]
    pub is_enterable: bool,
    /// Destination entity.
    #[serde(default)]
    pub leads_to: EntityId,
    /// Direction of travel.
    #[serde(default)]
    pub direction_type: DirectionType,
}

/// Descriptive text shown when inspected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspectable {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_inspectable: bool,
    /// Whether the entity is currently visible.
    #[serde(default)]
    pub is_visible: bool,
    /// Which entry of `text` is shown.
    #[serde(default)]
    pub text_index: u32,
    /// Description variants.
    #[serde(default)]
    pub text: Vec<String>,
}

/// Holds items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_container: bool,
    /// Capacity.
    #[serde(default)]
    pub num_spaces: u32,
    /// Held items.
    #[serde(default)]
    pub item_ids: Vec<EntityId>,
}

/// Something that can be carried.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_inventory_item: bool,
    /// Current holder.
    #[serde(default)]
    pub owner_id: EntityId,
    /// Whether players may pick it up.
    #[serde(default)]
    pub can_be_picked_up: bool,
}

/// A player avatar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Owning entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_player: bool,
    /// Controlling account.
    #[serde(default)]
    pub address: Felt,
    /// Current location.
    #[serde(default)]
    pub room: EntityId,
}

/// Upward link from a child to its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildToParent {
    /// Owning (child) entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_child: bool,
    /// The parent.
    #[serde(default)]
    pub parent: EntityId,
}

/// Downward links from a parent to its children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentToChildren {
    /// Owning (parent) entity.
    pub inst: EntityId,
    /// Marker flag.
    #[serde(default)]
    pub is_parent: bool,
    /// The children, each listed once.
    #[serde(default)]
    pub children: Vec<EntityId>,
}

/// The closed set of component kinds, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    /// [`Entity`]
    Entity,
    /// [`Area`]
    Area,
    /// [`Exit`]
    Exit,
    /// [`Inspectable`]
    Inspectable,
    /// [`Container`]
    Container,
    /// [`InventoryItem`]
    InventoryItem,
    /// [`Player`]
    Player,
    /// [`ChildToParent`]
    ChildToParent,
    /// [`ParentToChildren`]
    ParentToChildren,
}

impl ComponentKind {
    /// Every kind, in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Entity,
        Self::Area,
        Self::Exit,
        Self::Inspectable,
        Self::Container,
        Self::InventoryItem,
        Self::Player,
        Self::ChildToParent,
        Self::ParentToChildren,
    ];

    /// Component name as used in payloads and persisted files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Area => "Area",
            Self::Exit => "Exit",
            Self::Inspectable => "Inspectable",
            Self::Container => "Container",
            Self::InventoryItem => "InventoryItem",
            Self::Player => "Player",
            Self::ChildToParent => "ChildToParent",
            Self::ParentToChildren => "ParentToChildren",
        }
    }

    /// Suffix of the `create_*` / `delete_*` contract entrypoints.
    #[must_use]
    pub const fn call_suffix(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Area => "area",
            Self::Exit => "exit",
            Self::Inspectable => "inspectable",
            Self::Container => "container",
            Self::InventoryItem => "inventory_item",
            Self::Player => "player",
            Self::ChildToParent => "child_to_parent",
            Self::ParentToChildren => "parent_to_children",
        }
    }

    /// True for the two parent/child relation kinds.
    #[must_use]
    pub const fn is_relation(self) -> bool {
        matches!(self, Self::ChildToParent | Self::ParentToChildren)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::new(ErrorKind::Validation(format!("unknown component: {s}"))))
    }
}

/// A single component value, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// [`Entity`]
    Entity(Entity),
    /// [`Area`]
    Area(Area),
    /// [`Exit`]
    Exit(Exit),
    /// [`Inspectable`]
    Inspectable(Inspectable),
    /// [`Container`]
    Container(Container),
    /// [`InventoryItem`]
    InventoryItem(InventoryItem),
    /// [`Player`]
    Player(Player),
    /// [`ChildToParent`]
    ChildToParent(ChildToParent),
    /// [`ParentToChildren`]
    ParentToChildren(ParentToChildren),
}

impl Component {
    /// Returns the kind of this component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Entity(_) => ComponentKind::Entity,
            Self::Area(_) => ComponentKind::Area,
            Self::Exit(_) => ComponentKind::Exit,
            Self::Inspectable(_) => ComponentKind::Inspectable,
            Self::Container(_) => ComponentKind::Container,
            Self::InventoryItem(_) => ComponentKind::InventoryItem,
            Self::Player(_) => ComponentKind::Player,
            Self::ChildToParent(_) => ComponentKind::ChildToParent,
            Self::ParentToChildren(_) => ComponentKind::ParentToChildren,
        }
    }

    /// Returns the owning entity.
    #[must_use]
    pub fn inst(&self) -> EntityId {
        match self {
            Self::Entity(c) => c.inst,
            Self::Area(c) => c.inst,
            Self::Exit(c) => c.inst,
            Self::Inspectable(c) => c.inst,
            Self::Container(c) => c.inst,
            Self::InventoryItem(c) => c.inst,
            Self::Player(c) => c.inst,
            Self::ChildToParent(c) => c.inst,
            Self::ParentToChildren(c) => c.inst,
        }
    }

    /// Decodes a payload for the named component.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match the component shape.
    pub fn from_json(kind: ComponentKind, payload: serde_json::Value) -> Result<Self, Error> {
        fn decode<T: serde::de::DeserializeOwned>(
            payload: serde_json::Value,
        ) -> Result<T, Error> {
            serde_json::from_value(payload)
                .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
        }

        Ok(match kind {
            ComponentKind::Entity => Self::Entity(decode(payload)?),
            ComponentKind::Area => Self::Area(decode(payload)?),
            ComponentKind::Exit => Self::Exit(decode(payload)?),
            ComponentKind::Inspectable => Self::Inspectable(decode(payload)?),
            ComponentKind::Container => Self::Container(decode(payload)?),
            ComponentKind::InventoryItem => Self::InventoryItem(decode(payload)?),
            ComponentKind::Player => Self::Player(decode(payload)?),
            ComponentKind::ChildToParent => Self::ChildToParent(decode(payload)?),
            ComponentKind::ParentToChildren => Self::ParentToChildren(decode(payload)?),
        })
    }
}

macro_rules! component_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Self::$ty(value)
                }
            }
        )*
    };
}

component_from!(
    Entity,
    Area,
    Exit,
    Inspectable,
    Container,
    InventoryItem,
    Player,
    ChildToParent,
    ParentToChildren,
);

impl ToCalldata for Entity {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_entity.to_calldata(),
            self.name.to_calldata(),
            self.alt_names.to_calldata(),
        ])
    }
}

impl ToCalldata for Area {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_area.to_calldata(),
            self.area_type.index().to_calldata(),
        ])
    }
}

impl ToCalldata for Exit {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_exit.to_calldata(),
            self.is_enterable.to_calldata(),
            self.leads_to.to_calldata(),
            self.direction_type.index().to_calldata(),
        ])
    }
}

impl ToCalldata for Inspectable {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_inspectable.to_calldata(),
            self.is_visible.to_calldata(),
            self.text_index.to_calldata(),
            self.text.to_calldata(),
        ])
    }
}

impl ToCalldata for Container {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_container.to_calldata(),
            self.num_spaces.to_calldata(),
            self.item_ids.to_calldata(),
        ])
    }
}

impl ToCalldata for InventoryItem {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_inventory_item.to_calldata(),
            self.owner_id.to_calldata(),
            self.can_be_picked_up.to_calldata(),
        ])
    }
}

impl ToCalldata for Player {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_player.to_calldata(),
            self.address.to_calldata(),
            self.room.to_calldata(),
        ])
    }
}

impl ToCalldata for ChildToParent {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_child.to_calldata(),
            self.parent.to_calldata(),
        ])
    }
}

impl ToCalldata for ParentToChildren {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Record(vec![
            self.inst.to_calldata(),
            self.is_parent.to_calldata(),
            self.children.to_calldata(),
        ])
    }
}

impl ToCalldata for Component {
    fn to_calldata(&self) -> NestedValue {
        match self {
            Self::Entity(c) => c.to_calldata(),
            Self::Area(c) => c.to_calldata(),
            Self::Exit(c) => c.to_calldata(),
            Self::Inspectable(c) => c.to_calldata(),
            Self::Container(c) => c.to_calldata(),
            Self::InventoryItem(c) => c.to_calldata(),
            Self::Player(c) => c.to_calldata(),
            Self::ChildToParent(c) => c.to_calldata(),
            Self::ParentToChildren(c) => c.to_calldata(),
        }
    }
}
