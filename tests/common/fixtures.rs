use popcorn_player::models::{Episode, Media, MediaId, Movie, ShowId, Subtitle};

pub fn movie_with_subtitle(link: &str) -> Media {
    Media::Movie(Movie {
        id: MediaId::new("tt0133093"),
        title: "The Matrix".to_string(),
        subtitles: Some(vec![Subtitle::new(link, "English", "The.Matrix.1999.EN")]),
    })
}

pub fn plain_movie() -> Media {
    Media::Movie(Movie {
        id: MediaId::new("tt0062622"),
        title: "2001: A Space Odyssey".to_string(),
        subtitles: None,
    })
}

pub fn episode(number: u32) -> Episode {
    Episode {
        id: MediaId::new(format!("tt0959621-{}", number)),
        show_id: ShowId::new("tt0903747"),
        show_title: "Breaking Bad".to_string(),
        title: format!("Episode {}", number),
        season: 1,
        episode: number,
        subtitles: None,
    }
}
