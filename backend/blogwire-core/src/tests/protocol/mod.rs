mod atom_profile;
mod atom_version;
