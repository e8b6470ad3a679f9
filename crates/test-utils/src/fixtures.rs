//! Shared schema and source fixtures.
//!
//! The schema is shaped after the public Star Wars API so that queries in
//! tests read like queries users actually write. Inline fixtures are still
//! preferred when the schema structure is what a test is about.

/// Star Wars shaped schema with a non-default query root.
///
/// Covers:
/// - nested nullable lists (`allFilms.films`, `releaseDates`)
/// - an interface (`Node`) and a union (`SearchResult`)
/// - an enum (`Episode`)
/// - a custom scalar with no builtin mapping (`Date`)
/// - input objects, one of them self-referencing (`FilmFilter`)
/// - a mutation root and no subscription root
pub const SWAPI_SCHEMA: &str = r#"
schema {
    query: Root
    mutation: Mutation
}

type Root {
    allFilms(after: String, first: Int): FilmsConnection
    film(id: ID, filmID: ID): Film
    starship(id: ID, starshipID: ID): Starship
    node(id: ID!): Node
    search(text: String!): [SearchResult!]!
    filmsByEpisode(episodes: [Episode!]!, filter: FilmFilter): [Film]
    releaseDates: [[Date]]
}

type Mutation {
    rateFilm(input: RateFilmInput!): Film
}

interface Node {
    id: ID!
}

type FilmsConnection {
    films: [Film]
    totalCount: Int
}

type Film implements Node {
    title: String
    director: String
    episodeID: Int
    releaseDate: Date
    episode: Episode
    starships: [Starship!]
    id: ID!
}

type Starship implements Node {
    name: String
    model: String
    costInCredits: Float
    id: ID!
}

type Person implements Node {
    name: String
    id: ID!
}

union SearchResult = Film | Starship | Person

enum Episode {
    NEWHOPE
    EMPIRE
    JEDI
}

scalar Date

input FilmFilter {
    director: String
    episodes: [Episode!]
    and: FilmFilter
}

input RateFilmInput {
    filmId: ID!
    stars: Int!
    comment: String
}
"#;

/// Scenario A query: a nested selection over nullable lists.
pub const ALL_FILMS_QUERY: &str = "query { allFilms { films { title director } } }";

/// Scenario B query: a single non-null variable.
pub const STARSHIP_QUERY: &str = "query ($id: ID!) { starship(id: $id) { name id } }";

/// A TypeScript module importing the query function and calling it twice.
pub const TS_SOURCE: &str = r#"import gql from '$gql';

export async function load(id: string) {
    const films = await gql(`query { allFilms { films { title director } } }`);
    const ship = await gql("query ($id: ID!) { starship(id: $id) { name id } }", { id });
    return { films, ship };
}
"#;
