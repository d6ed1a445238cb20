mod atom;
mod atom_profiles;
mod factory;
mod json;
