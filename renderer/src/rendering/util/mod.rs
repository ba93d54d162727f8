pub mod bind_group_builder;
