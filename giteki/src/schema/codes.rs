/// Equipment-type codes used in the certification listings, keyed by the
/// article/paragraph/item of the certification rules they are granted under.
pub const RADIO_ACCESS_TECHNOLOGIES: &[(&str, &str)] = &[
    ("第2条第1項第1号", "市民ラジオの無線局に使用するための無線設備"),
    ("第2条第1項第6号", "特定小電力無線局の無線設備"),
    ("第2条第1項第8号", "小電力セキュリティシステムの無線局の無線設備"),
    ("第2条第1項第11号", "携帯無線通信を行う陸上移動局の無線設備"),
    ("第2条第1項第11号の3", "シングルキャリア周波数分割多元接続方式携帯無線通信を行う陸上移動局の無線設備 (LTE)"),
    ("第2条第1項第11号の7", "時分割・直交周波数分割多元接続方式携帯無線通信を行う陸上移動局の無線設備"),
    ("第2条第1項第19号", "2.4GHz帯高度化小電力データ通信システムの無線設備"),
    ("第2条第1項第19号の2", "2.4GHz帯小電力データ通信システムの無線設備 (周波数ホッピング)"),
    ("第2条第1項第19号の3", "5.2GHz帯及び5.3GHz帯小電力データ通信システムの無線設備"),
    ("第2条第1項第19号の3の2", "5.6GHz帯小電力データ通信システムの無線設備"),
    ("第2条第1項第46号", "920MHz帯小電力無線局の無線設備"),
    ("第2条第1項第47号", "デジタル簡易無線局の無線設備"),
];
