// Locale bundles
//
// Both bundles are values of the same `Messages` type, so a key that exists
// in one language and not the other does not compile.
use serde::{Deserialize, Serialize};

macro_rules! message_section {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            $(pub $field: &'static str,)+
        }

        impl $name {
            fn collect(&self, section: &str, out: &mut Vec<(String, &'static str)>) {
                $(out.push((format!("{}.{}", section, stringify!($field)), self.$field));)+
            }
        }
    };
}

message_section!(AppMessages { title });
message_section!(HeroMessages {
    eyebrow,
    heading,
    lede,
    refresh,
    load_more,
    view_favorites,
});
message_section!(CardMessages {
    ai_badge,
    prompt,
    seed,
    palette,
    favorite,
    favorited,
    unfavorite,
    view_original,
    unknown_time,
});
message_section!(CardGridMessages { title, empty });
message_section!(FavoritesMessages {
    title,
    refresh,
    empty,
    remove,
});
message_section!(ToastMessages {
    favorited,
    unfavorited,
    no_more,
    no_new,
    loading,
    error,
    busy,
    open_failed,
});
message_section!(LangMessages { switch });
message_section!(HelpMessages {
    title,
    navigate,
    focus,
    refresh,
    load_more,
    favorite,
    remove,
    favorites_refresh,
    open,
    language,
    cancel,
    help,
    quit,
    close,
});

/// One complete message bundle
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub app: AppMessages,
    pub hero: HeroMessages,
    pub card: CardMessages,
    pub card_grid: CardGridMessages,
    pub favorites: FavoritesMessages,
    pub toast: ToastMessages,
    pub lang: LangMessages,
    pub help: HelpMessages,
}

impl Messages {
    /// Every `section.key` path with its text, in declaration order
    pub fn entries(&self) -> Vec<(String, &'static str)> {
        let mut out = Vec::new();
        self.app.collect("app", &mut out);
        self.hero.collect("hero", &mut out);
        self.card.collect("card", &mut out);
        self.card_grid.collect("card_grid", &mut out);
        self.favorites.collect("favorites", &mut out);
        self.toast.collect("toast", &mut out);
        self.lang.collect("lang", &mut out);
        self.help.collect("help", &mut out);
        out
    }
}

pub static ZH: Messages = Messages {
    app: AppMessages {
        title: "世界之窗 — AI 新闻卡片",
    },
    hero: HeroMessages {
        eyebrow: "世界之窗 · 每日热点可视化",
        heading: "探索全球热点，收藏你的 AI 新闻卡片",
        lede: "从 RSS 抓取最新资讯，融合成带有 AI 图像提示的视觉卡片。滑动浏览、一键收藏、持续加载。",
        refresh: "刷新今日卡片",
        load_more: "加载更多",
        view_favorites: "查看收藏",
    },
    card: CardMessages {
        ai_badge: "AI",
        prompt: "Prompt",
        seed: "种子",
        palette: "调色板",
        favorite: "收藏",
        favorited: "已收藏",
        unfavorite: "取消收藏",
        view_original: "原文",
        unknown_time: "未知时间",
    },
    card_grid: CardGridMessages {
        title: "今日热点",
        empty: "暂无卡片，按 r 刷新今日卡片开始体验。",
    },
    favorites: FavoritesMessages {
        title: "收藏夹",
        refresh: "刷新",
        empty: "尚未收藏任何卡片",
        remove: "移除",
    },
    toast: ToastMessages {
        favorited: "已添加到收藏夹",
        unfavorited: "已从收藏夹移除",
        no_more: "没有更多卡片了",
        no_new: "这一批没有新卡片",
        loading: "加载中…",
        error: "请求失败",
        busy: "上一个请求尚未完成",
        open_failed: "无法打开链接",
    },
    lang: LangMessages { switch: "EN" },
    help: HelpMessages {
        title: "快捷键",
        navigate: "上下移动",
        focus: "切换卡片 / 收藏夹",
        refresh: "刷新今日卡片",
        load_more: "加载更多",
        favorite: "收藏 / 取消收藏",
        remove: "从收藏夹移除",
        favorites_refresh: "刷新收藏夹",
        open: "打开原文",
        language: "切换语言",
        cancel: "取消当前请求",
        help: "显示帮助",
        quit: "退出",
        close: "按 ? 或 ESC 关闭",
    },
};

pub static EN: Messages = Messages {
    app: AppMessages {
        title: "World Window — AI News Cards",
    },
    hero: HeroMessages {
        eyebrow: "World Window · Daily Highlights",
        heading: "Explore global trends, save your AI news cards",
        lede: "Aggregating the latest news via RSS, fused into visual cards with AI image prompts. Browse, bookmark, and keep loading.",
        refresh: "Refresh Today",
        load_more: "Load More",
        view_favorites: "Favorites",
    },
    card: CardMessages {
        ai_badge: "AI",
        prompt: "Prompt",
        seed: "Seed",
        palette: "Palette",
        favorite: "Save",
        favorited: "Saved",
        unfavorite: "Unsave",
        view_original: "Source",
        unknown_time: "Unknown",
    },
    card_grid: CardGridMessages {
        title: "Today's Headlines",
        empty: "No cards yet. Press r to refresh today's cards.",
    },
    favorites: FavoritesMessages {
        title: "Favorites",
        refresh: "Refresh",
        empty: "No favorites yet",
        remove: "Remove",
    },
    toast: ToastMessages {
        favorited: "Added to favorites",
        unfavorited: "Removed from favorites",
        no_more: "No more cards",
        no_new: "Nothing new in this batch",
        loading: "Loading…",
        error: "Request failed",
        busy: "Still waiting on the previous request",
        open_failed: "Could not open link",
    },
    lang: LangMessages { switch: "中文" },
    help: HelpMessages {
        title: "Keybindings",
        navigate: "Move up / down",
        focus: "Switch cards / favorites",
        refresh: "Refresh today's cards",
        load_more: "Load more",
        favorite: "Save / unsave",
        remove: "Remove from favorites",
        favorites_refresh: "Reload favorites",
        open: "Open source link",
        language: "Switch language",
        cancel: "Cancel current request",
        help: "Show help",
        quit: "Quit",
        close: "Press ? or ESC to close",
    },
};

/// Languages the UI ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Zh, Locale::En];

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::Zh => &ZH,
            Locale::En => &EN,
        }
    }

    /// The other locale. With two languages, switching is a toggle.
    pub fn toggled(self) -> Locale {
        match self {
            Locale::Zh => Locale::En,
            Locale::En => Locale::Zh,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" => Ok(Locale::Zh),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}' (expected zh or en)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundles_share_key_paths() {
        let zh: Vec<String> = ZH.entries().into_iter().map(|(k, _)| k).collect();
        let en: Vec<String> = EN.entries().into_iter().map(|(k, _)| k).collect();

        assert_eq!(zh, en);
        assert!(zh.contains(&"card.unfavorite".to_string()));
        assert!(zh.contains(&"favorites.remove".to_string()));
    }

    #[test]
    fn test_no_empty_messages() {
        for locale in Locale::ALL {
            for (key, text) in locale.messages().entries() {
                assert!(!text.trim().is_empty(), "{} is empty in {}", key, locale);
            }
        }
    }

    #[test]
    fn test_toggle_round_trips() {
        for locale in Locale::ALL {
            assert_ne!(locale.toggled(), locale);
            assert_eq!(locale.toggled().toggled(), locale);
        }
    }

    #[test]
    fn test_switch_button_names_other_language() {
        assert_eq!(Locale::Zh.messages().lang.switch, "EN");
        assert_eq!(Locale::En.messages().lang.switch, "中文");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("zh".parse::<Locale>(), Ok(Locale::Zh));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::Zh);
    }
}
