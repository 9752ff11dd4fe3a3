//! English → Russian synonym table for label expansion.
//!
//! Keys are normalized English words or phrases (hyphens written as spaces,
//! since label phrases are looked up that way). Values are normalized before
//! they reach a term set, so entries here may use any casing.

use std::collections::HashMap;
use std::sync::OnceLock;

const ENTRIES: &[(&str, &[&str])] = &[
    // Clothing
    ("t shirt", &["футболка", "t-shirt", "tshirt"]),
    ("shirt", &["рубашка", "сорочка"]),
    ("sleeve", &["рукав"]),
    ("active shirt", &["футболка", "спортивная футболка"]),
    ("jersey", &["джерси", "футболка"]),
    ("dress", &["платье"]),
    ("skirt", &["юбка"]),
    ("jeans", &["джинсы"]),
    ("denim", &["деним", "джинсы"]),
    ("trousers", &["брюки"]),
    ("pants", &["брюки", "штаны"]),
    ("shorts", &["шорты"]),
    ("jacket", &["куртка", "пиджак"]),
    ("coat", &["пальто"]),
    ("outerwear", &["верхняя одежда", "куртка"]),
    ("hoodie", &["худи", "толстовка"]),
    ("sweater", &["свитер"]),
    ("sweatshirt", &["свитшот", "толстовка"]),
    ("cardigan", &["кардиган"]),
    ("sock", &["носки"]),
    ("hat", &["шляпа", "шапка"]),
    ("cap", &["кепка"]),
    ("scarf", &["шарф"]),
    ("glove", &["перчатки"]),
    ("cotton", &["хлопок", "хлопковый"]),
    ("wool", &["шерсть"]),
    ("leather", &["кожа", "кожаный"]),
    // Footwear
    ("shoe", &["обувь", "туфли"]),
    ("footwear", &["обувь"]),
    ("sneakers", &["кроссовки", "кеды"]),
    ("boot", &["ботинки", "сапоги"]),
    ("sandal", &["сандалии"]),
    // Accessories
    ("bag", &["сумка"]),
    ("handbag", &["сумка", "сумочка"]),
    ("backpack", &["рюкзак"]),
    ("wallet", &["кошелек"]),
    ("belt", &["ремень"]),
    ("watch", &["часы"]),
    ("sunglasses", &["солнцезащитные очки", "очки"]),
    ("glasses", &["очки"]),
    ("jewellery", &["украшения", "бижутерия"]),
    ("necklace", &["ожерелье", "колье"]),
    ("ring", &["кольцо"]),
    ("earrings", &["серьги"]),
    // Home & kitchen
    ("mug", &["кружка"]),
    ("cup", &["чашка", "кружка"]),
    ("drinkware", &["посуда", "кружка"]),
    ("tableware", &["посуда"]),
    ("plate", &["тарелка"]),
    ("bottle", &["бутылка"]),
    ("water bottle", &["бутылка для воды"]),
    ("lamp", &["лампа", "светильник"]),
    ("chair", &["стул", "кресло"]),
    ("table", &["стол"]),
    ("pillow", &["подушка"]),
    ("blanket", &["плед", "одеяло"]),
    ("candle", &["свеча"]),
    // Electronics
    ("phone", &["телефон", "смартфон"]),
    ("mobile phone", &["телефон", "смартфон"]),
    ("headphones", &["наушники"]),
    ("laptop", &["ноутбук"]),
    ("computer", &["компьютер"]),
    ("camera", &["камера", "фотоаппарат"]),
    // Misc
    ("toy", &["игрушка"]),
    ("book", &["книга"]),
    ("notebook", &["блокнот", "тетрадь"]),
    ("pen", &["ручка"]),
    ("umbrella", &["зонт"]),
    // Colors
    ("red", &["красный"]),
    ("blue", &["синий", "голубой"]),
    ("green", &["зеленый"]),
    ("black", &["черный"]),
    ("white", &["белый"]),
    ("yellow", &["желтый"]),
    ("pink", &["розовый"]),
    ("grey", &["серый"]),
    ("gray", &["серый"]),
    ("brown", &["коричневый"]),
];

static TABLE: OnceLock<HashMap<&'static str, &'static [&'static str]>> = OnceLock::new();

fn table() -> &'static HashMap<&'static str, &'static [&'static str]> {
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Alternates for a normalized key, if it has any
pub fn lookup(key: &str) -> Option<&'static [&'static str]> {
    table().get(key).copied()
}
