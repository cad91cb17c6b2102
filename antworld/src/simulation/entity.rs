use slotmap::new_key_type;

new_key_type! {
    /// Key for the home slotmap.
    pub struct HomeKey;
    /// Key for the food slotmap.
    pub struct FoodKey;
    /// Key for the ant slotmap.
    pub struct AntKey;
    /// Key for the predator slotmap.
    pub struct PredatorKey;
}

/// Entity kinds, one arena each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Home,
    Food,
    Ant,
    Predator,
}

/// Tagged handle to any entity. This is what grid cells store.
///
/// Keys are generational: a handle to a removed entity never resolves again,
/// even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Home(HomeKey),
    Food(FoodKey),
    Ant(AntKey),
    Predator(PredatorKey),
}

impl EntityRef {
    pub fn kind(&self) -> Kind {
        match self {
            EntityRef::Home(_) => Kind::Home,
            EntityRef::Food(_) => Kind::Food,
            EntityRef::Ant(_) => Kind::Ant,
            EntityRef::Predator(_) => Kind::Predator,
        }
    }
}
