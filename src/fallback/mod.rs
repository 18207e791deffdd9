use crate::normalizer::text;
use crate::normalizer::FeedTotals;
use crate::pagination::total_pages_for;
use crate::post::{format_read_time, Post, DEFAULT_AUTHOR, PAGE_SIZE};

struct Placeholder {
    title: &'static str,
    excerpt: &'static str,
    image: &'static str,
    date: &'static str,
    category: &'static str,
    minutes: usize,
}

const SITE_BLOG: &str = "https://postmanoil.com/blog";

const PLACEHOLDERS: &[Placeholder] = &[
    Placeholder {
        title: "Crispy Aloo Pakoras",
        excerpt: "Golden, crunchy potato fritters fried in Postman groundnut oil for a light, non-greasy bite every monsoon evening.",
        image: "https://images.unsplash.com/photo-1601050690597-df0568f70950?w=800&q=80",
        date: "March 4, 2024",
        category: "Snacks",
        minutes: 5,
    },
    Placeholder {
        title: "Mustard Fish Curry",
        excerpt: "A Bengali classic where cold-pressed mustard oil brings out the sharp, tangy depth of the gravy.",
        image: "https://images.unsplash.com/photo-1626777552726-4a6b54c97e46?w=800&q=80",
        date: "February 26, 2024",
        category: "Seafood",
        minutes: 7,
    },
    Placeholder {
        title: "Dal Tadka",
        excerpt: "Yellow lentils finished with a smoking tempering of cumin, garlic and dried red chillies.",
        image: "https://images.unsplash.com/photo-1546833999-b9f581a1996d?w=800&q=80",
        date: "February 19, 2024",
        category: "Main Course",
        minutes: 4,
    },
    Placeholder {
        title: "Masala Dosa",
        excerpt: "Thin, crisp rice crepes with a spiced potato filling, cooked on a well-seasoned tawa with a few drops of oil.",
        image: "https://images.unsplash.com/photo-1589301760014-d929f3979dbc?w=800&q=80",
        date: "February 12, 2024",
        category: "Breakfast",
        minutes: 8,
    },
    Placeholder {
        title: "Paneer Tikka",
        excerpt: "Yogurt-marinated cottage cheese cubes charred with peppers and onions, brushed with oil between turns.",
        image: "https://images.unsplash.com/photo-1567188040759-fb8a883dc6d8?w=800&q=80",
        date: "February 5, 2024",
        category: "Starters",
        minutes: 6,
    },
    Placeholder {
        title: "Vegetable Biryani",
        excerpt: "Layered basmati rice and seasonal vegetables slow-cooked with whole spices and fried onions.",
        image: "https://images.unsplash.com/photo-1563379091339-03b21ab4a4f8?w=800&q=80",
        date: "January 29, 2024",
        category: "Main Course",
        minutes: 9,
    },
    Placeholder {
        title: "Chole Bhature",
        excerpt: "Fluffy deep-fried bread served with a robust chickpea curry, a Sunday favourite across North India.",
        image: "https://images.unsplash.com/photo-1626132647523-66f5bf380027?w=800&q=80",
        date: "January 22, 2024",
        category: "Main Course",
        minutes: 7,
    },
    Placeholder {
        title: "Medu Vada",
        excerpt: "Savoury lentil doughnuts with a crisp shell and soft centre, best with coconut chutney and sambar.",
        image: "https://images.unsplash.com/photo-1630383249896-424e482df921?w=800&q=80",
        date: "January 15, 2024",
        category: "Breakfast",
        minutes: 5,
    },
    Placeholder {
        title: "Baingan Bharta",
        excerpt: "Fire-roasted aubergine mashed with tomatoes, onions and a generous drizzle of mustard oil.",
        image: "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=800&q=80",
        date: "January 8, 2024",
        category: "Main Course",
        minutes: 4,
    },
    Placeholder {
        title: "Samosa Chaat",
        excerpt: "Crushed samosas topped with chickpeas, yogurt, tamarind and mint chutneys for a street-style plate.",
        image: "https://images.unsplash.com/photo-1601050690117-94f5f6fa8bd7?w=800&q=80",
        date: "January 1, 2024",
        category: "Snacks",
        minutes: 3,
    },
    Placeholder {
        title: "Kerala Fish Fry",
        excerpt: "Kingfish steaks rubbed with chilli, turmeric and curry leaves, shallow-fried until crisp at the edges.",
        image: "https://images.unsplash.com/photo-1580476262798-bddd9f4b7369?w=800&q=80",
        date: "December 25, 2023",
        category: "Seafood",
        minutes: 5,
    },
    Placeholder {
        title: "Gajar Halwa",
        excerpt: "Grated winter carrots slowly cooked with milk, sugar and cardamom, finished with roasted nuts.",
        image: "https://images.unsplash.com/photo-1605197161470-5d2a9af0a5ff?w=800&q=80",
        date: "December 18, 2023",
        category: "Desserts",
        minutes: 6,
    },
];

pub const FALLBACK_TOTAL_POSTS: usize = PLACEHOLDERS.len();

pub fn fallback_totals() -> FeedTotals {
    FeedTotals {
        total_posts: FALLBACK_TOTAL_POSTS as u64,
        total_pages: total_pages_for(FALLBACK_TOTAL_POSTS as u64),
    }
}

fn to_post(index: usize, p: &Placeholder) -> Post {
    let slug = text::slugify(p.title);
    Post {
        id: index as u64 + 1,
        title: p.title.to_string(),
        excerpt: text::truncate_excerpt(p.excerpt),
        original_url: format!("{SITE_BLOG}/{slug}"),
        slug,
        featured_image: p.image.to_string(),
        date: p.date.to_string(),
        author: DEFAULT_AUTHOR.to_string(),
        categories: vec![p.category.to_string(), "Recipes".to_string()],
        read_time: format_read_time(p.minutes),
    }
}

pub fn fallback_page(page: u32) -> Vec<Post> {
    let start = (page.max(1) as usize - 1).saturating_mul(PAGE_SIZE as usize);
    PLACEHOLDERS
        .iter()
        .enumerate()
        .skip(start)
        .take(PAGE_SIZE as usize)
        .map(|(i, p)| to_post(i, p))
        .collect()
}
