// Artists
pub const ARTIST_PROLIFIC: &str = "A1";
pub const ARTIST_TIE_FIRST: &str = "A2";
pub const ARTIST_TIE_SECOND: &str = "A3";
pub const ARTIST_RETIRED: &str = "Retired";
pub const ARTIST_ALBUMS_ONLY: &str = "Album Band";

// Listeners
pub const LISTENER_1: &str = "alice";
pub const LISTENER_2: &str = "bob";
pub const LISTENER_3: &str = "carol";

// Songs sharing a title across artists
pub const SHARED_TITLE: &str = "Hello";

// Counts for the seeded catalog
pub const SEEDED_SINGLES: usize = 9;
pub const SEEDED_ALBUMS: usize = 2;
pub const SEEDED_ALBUM_SONGS: usize = 4;
pub const SEEDED_RATINGS: usize = 6;
