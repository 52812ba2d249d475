//! Random test data.
//!
//! Each [`DataGenerator`] owns its RNG, so parallel tests never share random
//! state. [`DataGenerator::seeded`] gives reproducible data.

use rand::{
    distributions::{Alphanumeric, DistString},
    rngs::StdRng,
    seq::SliceRandom,
    Rng, SeedableRng,
};

use crate::models::{
    Card, GenreRequest, Location, MovieData, PaymentRequest, ReviewRequest, Role, UserData,
};

const FIRST_NAMES: &[&str] = &[
    "Alexander", "Maria", "Dmitry", "Anna", "Ivan", "Elena", "Sergey", "Olga", "Pavel", "Irina",
];
const LAST_NAMES: &[&str] = &[
    "Smirnov", "Ivanova", "Kuznetsov", "Popova", "Sokolov", "Lebedeva", "Kozlov", "Novikova",
];
const WORDS: &[&str] = &[
    "silent", "river", "midnight", "glass", "harbor", "ember", "northern", "echo", "velvet",
    "storm", "garden", "signal", "winter", "paper", "orbit", "lantern",
];
const PASSWORD_SPECIALS: &str = "?@#$%^&*|:";

pub struct DataGenerator<R: Rng = StdRng> {
    rng: R,
}

impl DataGenerator<StdRng> {
    pub fn new() -> DataGenerator<StdRng> {
        DataGenerator {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> DataGenerator<StdRng> {
        DataGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DataGenerator<StdRng> {
    fn default() -> Self {
        DataGenerator::new()
    }
}

impl<R: Rng> DataGenerator<R> {
    pub fn with_rng(rng: R) -> DataGenerator<R> {
        DataGenerator { rng }
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn lowercase_alnum(&mut self, len: usize) -> String {
        Alphanumeric
            .sample_string(&mut self.rng, len)
            .to_lowercase()
    }

    fn sentence(&mut self, words: usize) -> String {
        let mut sentence = (0..words).map(|_| self.pick(WORDS)).collect::<Vec<_>>().join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence + "."
    }

    pub fn email(&mut self) -> String {
        format!("kkkek{}@gmail.com", self.lowercase_alnum(8))
    }

    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    /// 8 to 20 characters with at least one letter and one digit.
    pub fn password(&mut self) -> String {
        let pool: Vec<char> = ('a'..='z')
            .chain('A'..='Z')
            .chain('0'..='9')
            .chain(PASSWORD_SPECIALS.chars())
            .collect();
        let mut password = vec![
            self.rng.gen_range(b'a'..=b'z') as char,
            self.rng.gen_range(b'0'..=b'9') as char,
        ];
        let rest = self.rng.gen_range(6..=18);
        password.extend((0..rest).filter_map(|_| pool.choose(&mut self.rng).copied()));
        password.shuffle(&mut self.rng);
        password.into_iter().collect()
    }

    pub fn uuid(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.gen())
            .into_uuid()
            .to_string()
    }

    /// Self-registration payload with role USER.
    pub fn user_data(&mut self) -> UserData {
        let password = self.password();
        UserData {
            email: self.email(),
            full_name: self.full_name(),
            password_repeat: password.clone(),
            password,
            roles: vec![Role::User],
            verified: None,
            banned: None,
        }
    }

    pub fn genre(&mut self) -> GenreRequest {
        GenreRequest::new(format!("Жанр {}", self.lowercase_alnum(6)))
    }

    pub fn movie(&mut self, genre_id: i64) -> MovieData {
        MovieData {
            name: format!("Тестовое кино - {} {}", self.sentence(2), self.lowercase_alnum(4)),
            description: self.sentence(12),
            price: self.rng.gen_range(50..=500),
            genre_id,
            image_url: Some(format!("https://picsum.photos/seed/{}/300/450", self.lowercase_alnum(6))),
            location: [Location::Msk, Location::Spb].choose(&mut self.rng).copied(),
            published: Some(true),
            rating: None,
        }
    }

    pub fn review(&mut self) -> ReviewRequest {
        ReviewRequest {
            rating: self.rng.gen_range(1..=5),
            text: format!("Тестовый отзыв - {}", self.sentence(8)),
        }
    }

    pub fn payment(&mut self, movie_id: i64) -> PaymentRequest {
        PaymentRequest {
            movie_id,
            amount: self.rng.gen_range(1..=10),
            card: Card::test_card(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::{Validate, EMAIL};
    use pretty_assertions::assert_eq;

    #[test]
    fn seeded_generators_agree() {
        let mut a = DataGenerator::seeded(7);
        let mut b = DataGenerator::seeded(7);
        assert_eq!(a.user_data(), b.user_data());
        assert_eq!(a.movie(1), b.movie(1));
    }

    #[test]
    fn passwords_satisfy_service_rules() {
        let mut data = DataGenerator::seeded(42);
        for _ in 0..200 {
            let password = data.password();
            let len = password.chars().count();
            assert!((8..=20).contains(&len), "{password}");
            assert!(password.chars().any(|c| c.is_ascii_alphabetic()), "{password}");
            assert!(password.chars().any(|c| c.is_ascii_digit()), "{password}");
            assert!(
                password
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c)),
                "{password}"
            );
        }
    }

    #[test]
    fn generated_payloads_pass_their_schemas() {
        let mut data = DataGenerator::new();
        let user = data.user_data();
        assert!(EMAIL.is_match(&user.email));
        user.validate().unwrap();
        data.movie(3).validate().unwrap();
        data.review().validate().unwrap();
        data.payment(3).validate().unwrap();
    }

    #[test]
    fn uuids_are_v4() {
        let id = DataGenerator::seeded(1).uuid();
        let parsed = uuid::Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
