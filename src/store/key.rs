// Anything settings can be looked up by

use poise::serenity_prelude as serenity;

/// A guild id, or something that carries one
pub trait GuildKey {
    fn guild_key(&self) -> u64;
}

impl GuildKey for u64 {
    fn guild_key(&self) -> u64 {
        *self
    }
}

impl GuildKey for serenity::GuildId {
    fn guild_key(&self) -> u64 {
        self.get()
    }
}

impl GuildKey for serenity::Guild {
    fn guild_key(&self) -> u64 {
        self.id.get()
    }
}

impl GuildKey for serenity::PartialGuild {
    fn guild_key(&self) -> u64 {
        self.id.get()
    }
}

impl<T: GuildKey + ?Sized> GuildKey for &T {
    fn guild_key(&self) -> u64 {
        (**self).guild_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_id_key() {
        let id = serenity::GuildId::new(1234);
        assert_eq!(id.guild_key(), 1234);
        assert_eq!((&id).guild_key(), 1234);
        assert_eq!(99u64.guild_key(), 99);
    }
}
