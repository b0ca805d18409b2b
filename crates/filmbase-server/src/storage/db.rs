//! `SQLite` database handle for the Filmbase server.

filmbase_core::define_database!(FilmDatabase, "Film database migrations complete");
