use reactive_graph::owner::Owner;

pub(crate) fn set_reactive_owner() -> Owner {
    let owner = Owner::new();
    owner.set();
    owner
}

mod query;
mod rendering;
mod resolve;
mod visibility;
